//! # Linear algebra primitives
//!
//! Dense matrices for the matching equations and for the row operations of a tableau.
pub mod matrix;
