//! # Strategies
//!
//! Decisions that can be made in several ways while restoring feasibility.
pub mod pivot_rule;
