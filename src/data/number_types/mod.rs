//! # Number types
//!
//! The tableaux are computed with exactly. Any integer type can be used that implements the
//! `IntType` trait, the choice trades speed against the size of the triangulations that can be
//! handled without overflow.
pub mod traits;
