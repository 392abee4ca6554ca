//! # Tree traversal linear programming
//!
//! Exact linear programming over the matching equations of a 3-manifold triangulation, as used
//! by tree traversal enumeration of normal surfaces and angle structures.
//!
//! A search builds a single `LPInitialTableaux` for a triangulation, and at each node of its
//! search tree modifies a copy of an `LPData` by constraining columns to be zero or positive, or
//! by declaring an octagon type. Feasibility of the result decides whether the subtree can be
//! pruned, and at the leaves a solution is read off in the original coordinates.
//!
//! All arithmetic is exact and fraction free, over any integer type implementing `IntType`.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod error;

#[cfg(test)]
mod tests;
