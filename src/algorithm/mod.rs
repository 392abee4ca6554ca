//! # Algorithms
pub mod tree_lp;
