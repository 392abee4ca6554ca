//! # Tree traversal tableaux
//!
//! The tableaux are built once per search with `LPInitialTableaux`, and modified incrementally
//! through `LPData`. The matching equations can be extended with the rows of a
//! `LinearConstraint`, and columns can be excluded up front with a `BanConstraint`.
pub mod column;
pub mod constraint;
pub mod data;
pub mod initial_tableaux;
pub mod strategy;
