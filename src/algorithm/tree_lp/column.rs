//! # Sparse columns
//!
//! Matching equations have very few non zero coefficients per column, and those are small. A
//! column of the initial tableau is therefore stored as two short lists of row indices, one for
//! each sign, with repeated indices for coefficients larger than one in absolute value.
use std::fmt::{Debug, Formatter};
use std::fmt;

use crate::algorithm::tree_lp::constraint::LinearConstraint;
use crate::error::LPError;

/// Maximum number of `+1` (or `-1`) entries in a column.
pub const MAX_ENTRIES: usize = 4;

/// A column of the initial tableau.
///
/// The matching equation part is stored sparsely, the coefficients in the rows added by the
/// linear constraint `C` are stored densely in `extra`.
pub struct LPCol<C: LinearConstraint> {
    plus: [usize; MAX_ENTRIES],
    nr_plus: usize,
    minus: [usize; MAX_ENTRIES],
    nr_minus: usize,
    /// Coefficient of this column in each of the rows added by the linear constraint.
    pub extra: C::Coefficients,
}

impl<C: LinearConstraint> LPCol<C> {
    /// Create an empty column.
    pub fn new() -> Self {
        LPCol {
            plus: [0; MAX_ENTRIES],
            nr_plus: 0,
            minus: [0; MAX_ENTRIES],
            nr_minus: 0,
            extra: C::Coefficients::default(),
        }
    }

    /// Add an entry to the column.
    ///
    /// # Arguments
    ///
    /// * `row`: Row index, not yet present in the column.
    /// * `value`: Coefficient, split up in `|value|` row indices of its sign.
    ///
    /// # Return value
    ///
    /// `InvalidArgument` if more than `MAX_ENTRIES` indices of one sign would be needed.
    pub fn push(&mut self, row: usize, value: i64) -> Result<(), LPError> {
        let (indices, count) = if value > 0 {
            (&mut self.plus, &mut self.nr_plus)
        } else {
            (&mut self.minus, &mut self.nr_minus)
        };
        let magnitude = value.unsigned_abs() as usize;
        if *count + magnitude > MAX_ENTRIES {
            return Err(LPError::invalid_argument(format!(
                "a column of the matching equations has more than {} entries of the same sign",
                MAX_ENTRIES,
            )));
        }

        indices[*count..*count + magnitude].fill(row);
        *count += magnitude;
        Ok(())
    }

    /// Rows with a `+1`, repeated for larger coefficients.
    pub fn plus(&self) -> &[usize] {
        &self.plus[..self.nr_plus]
    }

    /// Rows with a `-1`, repeated for larger coefficients.
    pub fn minus(&self) -> &[usize] {
        &self.minus[..self.nr_minus]
    }

    /// Coefficient in row `row` of the matching equation part.
    pub fn value(&self, row: usize) -> i64 {
        let plus = self.plus().iter().filter(|&&r| r == row).count() as i64;
        let minus = self.minus().iter().filter(|&&r| r == row).count() as i64;
        plus - minus
    }
}

impl<C: LinearConstraint> Default for LPCol<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: LinearConstraint> Clone for LPCol<C> {
    fn clone(&self) -> Self {
        LPCol {
            plus: self.plus,
            nr_plus: self.nr_plus,
            minus: self.minus,
            nr_minus: self.nr_minus,
            extra: self.extra,
        }
    }
}

impl<C: LinearConstraint> Debug for LPCol<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LPCol")
            .field("plus", &self.plus())
            .field("minus", &self.minus())
            .field("extra", &self.extra)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::tree_lp::column::LPCol;
    use crate::algorithm::tree_lp::constraint::{EulerPositive, NoConstraint};

    #[test]
    fn push() {
        let mut column = LPCol::<NoConstraint>::new();
        column.push(0, 2).unwrap();
        column.push(3, -1).unwrap();
        column.push(5, 1).unwrap();
        assert_eq!(column.plus(), &[0, 0, 5]);
        assert_eq!(column.minus(), &[3]);
        assert_eq!(column.value(0), 2);
        assert_eq!(column.value(3), -1);
        assert_eq!(column.value(4), 0);
    }

    #[test]
    fn too_many_entries() {
        let mut column = LPCol::<NoConstraint>::new();
        column.push(0, -3).unwrap();
        assert!(column.push(1, -2).is_err());
        assert!(column.push(2, 4).is_ok());
        assert!(column.push(3, 1).is_err());
    }

    #[test]
    fn extra() {
        let mut column = LPCol::<EulerPositive>::new();
        assert_eq!(column.extra, [0]);
        column.extra[0] = -2;
        assert_eq!(column.clone().extra, [-2]);
    }
}
