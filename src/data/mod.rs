//! # Triangulations, coordinates and solutions
//!
//! This module provides the data structures that the tableaux are built from and that their
//! solutions are read back into. Algorithms introduce their specific data structures in
//! `algorithm::my_algorithm`.
pub mod encoding;
pub mod linear_algebra;
pub mod number_types;
pub mod surface;
pub mod triangulation;
