//! # Pivot rules
//!
//! Strategies for restoring feasibility of a tableau with row pivots. A row with a negative
//! right hand side is selected to leave, after which a column with a negative entry in that row
//! enters the basis.
use crate::algorithm::tree_lp::constraint::LinearConstraint;
use crate::algorithm::tree_lp::data::LPData;
use crate::data::number_types::traits::IntType;

/// Deciding how to pivot towards a feasible basis.
///
/// Both selections are only made while the tableau still has a basis row with a negative value.
pub trait PivotRule {
    /// Create a new instance.
    fn new<C: LinearConstraint, I: IntType>(data: &LPData<C, I>) -> Self;

    /// Row whose basic variable leaves the basis.
    ///
    /// # Return value
    ///
    /// `None` if no basic variable is negative, such that the tableau is feasible.
    fn select_leaving_row<C: LinearConstraint, I: IntType>(&mut self, data: &LPData<C, I>) -> Option<usize>;

    /// Column that enters the basis at `row`.
    ///
    /// # Return value
    ///
    /// `None` if no active non basic column has a negative entry in the row, such that the
    /// tableau is infeasible.
    fn select_entering_column<C: LinearConstraint, I: IntType>(
        &mut self,
        data: &LPData<C, I>,
        row: usize,
    ) -> Option<usize>;
}

/// Leave with the most negative basic variable and enter with the last eligible column.
///
/// Columns at the end of the tableau correspond to tetrahedra that the search fixes late, such
/// that their variables are the cheapest to move into the basis.
pub struct LargestInfeasibility;
impl PivotRule for LargestInfeasibility {
    fn new<C: LinearConstraint, I: IntType>(_data: &LPData<C, I>) -> Self {
        Self
    }

    fn select_leaving_row<C: LinearConstraint, I: IntType>(&mut self, data: &LPData<C, I>) -> Option<usize> {
        let mut leaving: Option<(usize, I)> = None;
        for row in (0..data.rank()).filter(|&row| data.rhs(row).is_negative()) {
            let pivot = data.entry(row, data.basic_column(row));
            match &leaving {
                None => leaving = Some((row, pivot)),
                Some((best_row, best_pivot)) => {
                    // Compare rhs[row] / pivot and rhs[best_row] / best_pivot, both pivots are
                    // positive.
                    let mut value = data.rhs(row).clone();
                    value *= best_pivot;
                    let mut best = data.rhs(*best_row).clone();
                    best *= &pivot;
                    if value < best {
                        leaving = Some((row, pivot));
                    }
                },
            }
        }

        leaving.map(|(row, _)| row)
    }

    fn select_entering_column<C: LinearConstraint, I: IntType>(
        &mut self,
        data: &LPData<C, I>,
        row: usize,
    ) -> Option<usize> {
        (0..data.columns()).rev()
            .filter(|&column| data.is_non_basic(column))
            .find(|&column| data.entry(row, column).is_negative())
    }
}

/// Bland's rule: smallest index choices, both for the leaving and entering variable.
///
/// Slower than `LargestInfeasibility`, but can't cycle.
pub struct Bland;
impl PivotRule for Bland {
    fn new<C: LinearConstraint, I: IntType>(_data: &LPData<C, I>) -> Self {
        Self
    }

    fn select_leaving_row<C: LinearConstraint, I: IntType>(&mut self, data: &LPData<C, I>) -> Option<usize> {
        (0..data.rank())
            .filter(|&row| data.rhs(row).is_negative())
            .min_by_key(|&row| data.basic_column(row))
    }

    fn select_entering_column<C: LinearConstraint, I: IntType>(
        &mut self,
        data: &LPData<C, I>,
        row: usize,
    ) -> Option<usize> {
        (0..data.columns())
            .filter(|&column| data.is_non_basic(column))
            .find(|&column| data.entry(row, column).is_negative())
    }
}
