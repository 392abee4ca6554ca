//! # Error reporting
//!
//! Problems encountered while building a tableau, or while reading a solution back out of one.
//!
//! Infeasibility of a linear program is not an error; it is reported through
//! `LPData::is_feasible`.
use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// An `LPError` is created when the input to one of the tableau operations is not acceptable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LPError {
    /// The triangulation, the encoding or another argument does not meet the requirements of the
    /// operation.
    ///
    /// The contained `String` is a message for the end user.
    InvalidArgument(String),
    /// A value did not fit in the integer type that the tableau was instantiated with.
    ///
    /// The contained `String` describes where this happened.
    Overflow(String),
}

impl LPError {
    /// Create a new `InvalidArgument` error.
    ///
    /// # Arguments
    ///
    /// * `description`: What's wrong with the argument.
    pub fn invalid_argument(description: impl Into<String>) -> Self {
        LPError::InvalidArgument(description.into())
    }

    /// Create a new `Overflow` error.
    ///
    /// # Arguments
    ///
    /// * `description`: Which value could not be represented.
    pub fn overflow(description: impl Into<String>) -> Self {
        LPError::Overflow(description.into())
    }
}

impl Display for LPError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LPError::InvalidArgument(description) => write!(f, "InvalidArgument: {}", description),
            LPError::Overflow(description) => write!(f, "Overflow: {}", description),
        }
    }
}

impl Error for LPError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}
