//! # Working tableau
//!
//! The tableau that a tree traversal modifies at each node. Columns of the initial tableau are
//! never copied; only the row operations that have been applied are stored, and entries of the
//! current tableau are computed on demand by multiplying a row of these operations with a sparse
//! column of the `LPInitialTableaux`.
//!
//! All arithmetic is fraction free. Each row is kept divided by the gcd of its row operations,
//! and the value of the basic variable of row `i` is `rhs[i] / entry(i, basis[i])`.
use std::fmt::{Display, Formatter};
use std::fmt;
use std::ptr;

use itertools::repeat_n;
use log::{debug, trace};
use num_bigint::BigInt;
use num_traits::Zero;

use crate::algorithm::tree_lp::constraint::{ConstraintKind, LinearConstraint};
use crate::algorithm::tree_lp::initial_tableaux::LPInitialTableaux;
use crate::algorithm::tree_lp::strategy::pivot_rule::{Bland, LargestInfeasibility, PivotRule};
use crate::data::encoding::{LPSystem, NormalEncoding};
use crate::data::linear_algebra::matrix::LPMatrix;
use crate::data::number_types::traits::IntType;
use crate::data::surface::{AngleStructure, NormalSurface, Octagon};
use crate::error::LPError;

/// Number of pivots without a decrease in the number of negative basic variables, per row of the
/// tableau, after which `make_feasible` switches to Bland's rule.
///
/// Pivots that only shrink the negative values, without changing their count, also count as
/// stalled, so the switch can happen before an actual cycle.
pub const CYCLE_THRESHOLD_FACTOR: usize = 4;

/// Role of a column in the current basis.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnState {
    /// Constrained to zero, the column no longer takes part.
    Inactive,
    /// Active, but not in the basis.
    NonBasic,
    /// In the basis, defined by the contained row.
    Basic(usize),
}

/// A tableau derived from an `LPInitialTableaux` by a sequence of constraints.
///
/// Storage is allocated once with `reserve`, after which the tableau is initialized with
/// `init_start` or `init_clone`. Once the tableau became infeasible, only `is_feasible` is
/// meaningful.
pub struct LPData<'a, C: LinearConstraint, I: IntType> {
    origin: &'a LPInitialTableaux<'a, C>,
    rhs: Vec<I>,
    /// Row operations applied to the initial tableau, `origin.rank()` square.
    row_ops: LPMatrix<I>,
    /// Number of rows in use, the remaining rows have become zero.
    rank: usize,
    /// Basic column of each row, only the first `rank` values are meaningful.
    basis: Vec<usize>,
    state: Vec<ColumnState>,
    /// Columns that `constrain_positive` was applied to.
    positive: Vec<bool>,
    /// Primary and secondary quad column of the octagon type, if one was declared.
    octagon: Option<(usize, usize)>,
    feasible: bool,
}

impl<'a, C: LinearConstraint, I: IntType> LPData<'a, C, I> {
    /// Allocate a tableau for the given origin.
    ///
    /// The result needs to be initialized before it can be used.
    pub fn reserve(origin: &'a LPInitialTableaux<'a, C>) -> Self {
        let rank = origin.rank();
        let columns = origin.columns();

        LPData {
            origin,
            rhs: Vec::with_capacity(rank),
            row_ops: LPMatrix::reserve(rank, rank),
            rank: 0,
            basis: Vec::with_capacity(rank),
            state: Vec::with_capacity(columns),
            positive: Vec::with_capacity(columns),
            octagon: None,
            feasible: false,
        }
    }

    /// Initialize at the root of the search tree.
    ///
    /// An initial basis is found by Gauss-Jordan elimination, after which the rows of the linear
    /// constraint are enforced.
    ///
    /// # Return value
    ///
    /// `Overflow` if the row operations of the initial basis don't fit in `I`.
    pub fn init_start(&mut self) -> Result<(), LPError> {
        let size = self.origin.rank();
        let columns = self.origin.columns();

        self.rank = size;
        self.rhs.clear();
        self.rhs.extend(repeat_n(I::zero(), size));
        self.basis.clear();
        self.basis.resize(size, 0);
        self.state.clear();
        self.state.resize(columns, ColumnState::NonBasic);
        self.positive.clear();
        self.positive.resize(columns, false);
        self.octagon = None;
        self.feasible = true;

        self.find_initial_basis()?;

        let first_slack = self.origin.coordinate_columns();
        for (k, kind) in C::CONSTRAINTS.iter().enumerate() {
            match kind {
                ConstraintKind::Positive => self.constrain_positive(first_slack + k),
                ConstraintKind::Zero => self.constrain_zero(first_slack + k),
            }
        }
        self.verify_if_enabled();

        Ok(())
    }

    /// Initialize as a copy of a tableau with the same origin.
    ///
    /// No allocation happens if `parent` fits in the storage of this tableau, which is the case
    /// if both were reserved for the same origin.
    pub fn init_clone(&mut self, parent: &Self) {
        debug_assert!(ptr::eq(self.origin, parent.origin));

        self.rhs.clone_from(&parent.rhs);
        self.row_ops.init_clone(&parent.row_ops);
        self.rank = parent.rank;
        self.basis.clone_from(&parent.basis);
        self.state.clone_from(&parent.state);
        self.positive.clone_from(&parent.positive);
        self.octagon = parent.octagon;
        self.feasible = parent.feasible;
    }

    /// Gauss-Jordan elimination on the initial tableau.
    ///
    /// In each row, the leftmost column with a non zero entry that isn't basic yet enters the
    /// basis. Rows that become entirely zero are moved to the end, and the rank is decreased.
    /// The elimination is done in arbitrary precision.
    fn find_initial_basis(&mut self) -> Result<(), LPError> {
        let size = self.origin.rank();
        let columns = self.origin.columns();

        let mut tableaux = LPMatrix::<BigInt>::reserve(size, columns);
        self.origin.fill_initial_tableaux(&mut tableaux);
        let mut operations = LPMatrix::<BigInt>::reserve(size, size);
        operations.init_identity(size);

        let mut row = 0;
        while row < self.rank {
            let column = (0..columns).find(|&column| {
                self.state[column] == ColumnState::NonBasic && !tableaux.entry(row, column).is_zero()
            });
            let Some(column) = column else {
                self.rank -= 1;
                tableaux.swap_rows(row, self.rank);
                operations.swap_rows(row, self.rank);
                continue;
            };

            self.basis[row] = column;
            self.state[column] = ColumnState::Basic(row);
            let mut pivot = tableaux.entry(row, column).clone();
            if pivot.is_negative() {
                pivot.negate();
                tableaux.negate_row(row);
                operations.negate_row(row);
            }
            for other in 0..self.rank {
                if other == row {
                    continue;
                }
                let coefficient = tableaux.entry(other, column).clone();
                if !coefficient.is_zero() {
                    let gcd = operations.comb_row_and_norm(&pivot, other, &coefficient, row);
                    tableaux.comb_row(&pivot, other, &coefficient, row, &gcd);
                }
            }
            row += 1;
        }

        self.row_ops.init_zero(size, size);
        for i in 0..size {
            for j in 0..size {
                *self.row_ops.entry_mut(i, j) = I::from_big_int(operations.entry(i, j))
                    .ok_or_else(|| LPError::overflow(format!(
                        "row operation {} at ({}, {}) of the initial basis", operations.entry(i, j), i, j,
                    )))?;
            }
        }

        Ok(())
    }

    /// Force a column to zero, and deactivate it.
    ///
    /// If the column is basic, it is pivoted out of the basis first. When no column can replace
    /// it, its row is dropped or, if its value is positive, the tableau becomes infeasible.
    ///
    /// A column that was already constrained to be positive can't be zero, and makes the tableau
    /// infeasible. An inactive column is ignored.
    pub fn constrain_zero(&mut self, column: usize) {
        debug_assert!(column < self.origin.columns());

        if !self.is_active(column) || !self.feasible {
            return;
        }
        if self.positive[column] {
            debug!("Column {} was constrained to be positive earlier, can't be zero", column);
            self.feasible = false;
            return;
        }

        let mut restore = false;
        if let ColumnState::Basic(row) = self.state[column] {
            if self.rhs[row].is_zero() {
                match self.last_non_basic(row, |entry| !entry.is_zero()) {
                    Some(entering) => self.pivot(row, entering),
                    None => self.drop_row(row),
                }
            } else {
                match self.last_non_basic(row, |entry| entry.is_positive()) {
                    Some(entering) => {
                        self.pivot(row, entering);
                        restore = true;
                    },
                    None => {
                        self.feasible = false;
                        return;
                    },
                }
            }
        }
        self.state[column] = ColumnState::Inactive;

        if restore {
            self.make_feasible();
        }
        self.verify_if_enabled();
    }

    /// Require a column to be strictly positive.
    ///
    /// Done by the change of variable `x <- x - 1`, so integer solutions of the new tableau
    /// correspond to solutions of the old tableau with `x >= 1`. Inactive columns can't be
    /// positive, constraining them makes the tableau infeasible.
    pub fn constrain_positive(&mut self, column: usize) {
        debug_assert!(column < self.origin.columns());

        if !self.is_active(column) {
            debug!("Column {} is inactive, can't be positive", column);
            self.feasible = false;
            return;
        }
        if !self.feasible {
            return;
        }

        self.positive[column] = true;
        if let ColumnState::Basic(row) = self.state[column] {
            let entry = self.entry(row, column);
            self.rhs[row] -= &entry;
            if self.rhs[row].is_negative() {
                self.make_feasible();
            }
        } else {
            for row in 0..self.rank {
                let entry = self.entry(row, column);
                self.rhs[row] -= &entry;
            }
            self.make_feasible();
        }
        self.verify_if_enabled();
    }

    /// Declare that two quad columns of the same tetrahedron together form an octagon type.
    ///
    /// One of the columns, the primary, is reused for the octagon coordinate, which is required to
    /// be positive. The other column, the secondary, is forced to zero. Both need to be active.
    ///
    /// Only one octagon type can be declared.
    pub fn constrain_oct(&mut self, first: usize, second: usize) {
        debug_assert!(self.octagon.is_none(), "only a single octagon type can be declared");
        debug_assert_ne!(first, second);

        if !self.is_active(first) || !self.is_active(second) {
            debug!("Octagon from columns {} and {} would use an inactive quad", first, second);
            self.feasible = false;
            return;
        }
        if !self.feasible {
            return;
        }

        // Non basic columns come first, such that the primary is cheap to process.
        let order = |row: Option<usize>| row.map_or(0, |row| row + 1);
        let (primary, secondary) = if order(self.basis_row(first)) <= order(self.basis_row(second)) {
            (first, second)
        } else {
            (second, first)
        };
        self.octagon = Some((primary, secondary));

        if let Some(row) = self.basis_row(primary) {
            // The column of the primary changed, the basis needs to be repaired.
            if !self.entry(row, primary).is_zero() {
                self.eliminate(row, primary);
                self.make_feasible();
            } else if let Some(entering) = self.last_non_basic(row, |entry| !entry.is_zero()) {
                self.pivot(row, entering);
                self.make_feasible();
            } else if !self.rhs[row].is_zero() {
                debug!("Octagon from columns {} and {} contradicts row {}", primary, secondary, row);
                self.feasible = false;
                return;
            } else {
                self.state[primary] = ColumnState::NonBasic;
                self.drop_row(row);
            }

            if !self.feasible {
                return;
            }
        }

        self.constrain_zero(secondary);
        self.constrain_positive(primary);
    }

    /// Pivot until no basic variable is negative, or until infeasibility is detected.
    ///
    /// Pivots are selected with the `LargestInfeasibility` rule. If the number of negative basic
    /// variables doesn't reach a new minimum for too long, the remaining pivots are done with
    /// Bland's rule.
    fn make_feasible(&mut self) {
        self.make_feasible_within(CYCLE_THRESHOLD_FACTOR * self.origin.rank());
    }

    /// As `make_feasible`, switching to Bland's rule after `budget` pivots without progress.
    ///
    /// With a budget of zero, all pivots are done with Bland's rule.
    fn make_feasible_within(&mut self, budget: usize) {
        let mut rule = LargestInfeasibility::new(self);

        let mut fewest_infeasible: Option<usize> = None;
        let mut stalled = 0;
        while let Some(row) = rule.select_leaving_row(self) {
            let nr_infeasible = self.nr_infeasible_rows();
            if fewest_infeasible.is_none_or(|fewest| nr_infeasible < fewest) {
                fewest_infeasible = Some(nr_infeasible);
                stalled = 0;
            } else {
                stalled += 1;
            }
            if stalled >= budget {
                debug!("No progress in {} pivots, switching to Bland's rule", budget);
                self.make_feasible_anti_cycling();
                return;
            }

            match rule.select_entering_column(self, row) {
                Some(entering) => self.pivot(row, entering),
                None => {
                    self.feasible = false;
                    return;
                },
            }
        }
    }

    /// Pivot with Bland's rule until no basic variable is negative.
    fn make_feasible_anti_cycling(&mut self) {
        let mut rule = Bland::new(self);

        while let Some(row) = rule.select_leaving_row(self) {
            match rule.select_entering_column(self, row) {
                Some(entering) => self.pivot(row, entering),
                None => {
                    self.feasible = false;
                    return;
                },
            }
        }
    }

    /// Replace the basic variable of `row` by the column `entering`.
    ///
    /// # Arguments
    ///
    /// * `row`: Row that is in use.
    /// * `entering`: Active non basic column with a non zero entry in `row`.
    fn pivot(&mut self, row: usize, entering: usize) {
        debug_assert!(row < self.rank);
        debug_assert!(self.is_non_basic(entering));

        let leaving = self.basis[row];
        trace!("Pivot on row {}: column {} leaves, column {} enters", row, leaving, entering);

        self.state[leaving] = ColumnState::NonBasic;
        self.state[entering] = ColumnState::Basic(row);
        self.basis[row] = entering;
        self.eliminate(row, entering);
    }

    /// Make `column` a unit column, up to scaling, with its non zero entry in `row`.
    ///
    /// The entry in `row` is made positive. All other rows are combined with `row` and normalized,
    /// the right hand side follows along.
    fn eliminate(&mut self, row: usize, column: usize) {
        let mut pivot = self.entry(row, column);
        debug_assert!(!pivot.is_zero());

        if pivot.is_negative() {
            pivot.negate();
            self.rhs[row].negate();
            self.row_ops.negate_row(row);
        }

        for other in 0..self.rank {
            if other == row {
                continue;
            }
            let coefficient = self.entry(other, column);
            if coefficient.is_zero() {
                continue;
            }

            let gcd = self.row_ops.comb_row_and_norm(&pivot, other, &coefficient, row);
            let mut subtracted = self.rhs[row].clone();
            subtracted *= &coefficient;
            let value = &mut self.rhs[other];
            *value *= &pivot;
            *value -= &subtracted;
            value.div_assign_exact(&gcd);
        }
    }

    /// Remove a row that has no role left, by swapping it with the last row in use.
    ///
    /// The basic variable of the dropped row is left to the caller.
    fn drop_row(&mut self, row: usize) {
        debug_assert!(row < self.rank);

        self.rank -= 1;
        if row != self.rank {
            self.rhs.swap(row, self.rank);
            self.row_ops.swap_rows(row, self.rank);
            self.basis[row] = self.basis[self.rank];
            self.state[self.basis[row]] = ColumnState::Basic(row);
        }
    }

    /// The highest active non basic column whose entry in `row` satisfies `predicate`.
    fn last_non_basic(&self, row: usize, predicate: impl Fn(&I) -> bool) -> Option<usize> {
        (0..self.origin.columns()).rev()
            .filter(|&column| self.is_non_basic(column))
            .find(|&column| predicate(&self.entry(row, column)))
    }

    fn nr_infeasible_rows(&self) -> usize {
        self.rhs[..self.rank].iter().filter(|value| value.is_negative()).count()
    }

    fn verify_if_enabled(&self) {
        if cfg!(feature = "verify") && self.feasible {
            debug_assert!(self.verify(), "tableau invariants don't hold:\n{}", self);
        }
    }

    /// Entry of the current tableau.
    ///
    /// Computed from the row operations and the initial tableau. For the primary column of the
    /// octagon type, this is the sum of both quad columns with the linear constraint adjusted.
    pub fn entry(&self, row: usize, column: usize) -> I {
        debug_assert!(row < self.rank);

        match self.octagon {
            Some((primary, secondary)) if primary == column => {
                let mut total = self.origin.mult_col_by_row_oct(&self.row_ops, row, primary);
                total += &self.origin.mult_col_by_row_oct(&self.row_ops, row, secondary);
                total
            },
            _ => self.origin.mult_col_by_row(&self.row_ops, row, column),
        }
    }

    /// Sign of the current value of a column.
    ///
    /// # Return value
    ///
    /// `1` if the column is basic with a positive value, `0` otherwise. Non basic columns are zero.
    pub fn sign(&self, column: usize) -> i32 {
        match self.state[column] {
            ColumnState::Basic(row) => self.rhs[row].sign(),
            _ => 0,
        }
    }

    /// Whether the column wasn't constrained to zero.
    pub fn is_active(&self, column: usize) -> bool {
        self.state[column] != ColumnState::Inactive
    }

    /// Whether the column is active and not in the basis.
    pub fn is_non_basic(&self, column: usize) -> bool {
        self.state[column] == ColumnState::NonBasic
    }

    /// State of a column.
    pub fn column_state(&self, column: usize) -> ColumnState {
        self.state[column]
    }

    /// Row of a basic column.
    pub fn basis_row(&self, column: usize) -> Option<usize> {
        match self.state[column] {
            ColumnState::Basic(row) => Some(row),
            _ => None,
        }
    }

    /// Basic column of a row in use.
    pub fn basic_column(&self, row: usize) -> usize {
        debug_assert!(row < self.rank);

        self.basis[row]
    }

    /// Right hand side of a row in use, in the scale of that row.
    pub fn rhs(&self, row: usize) -> &I {
        debug_assert!(row < self.rank);

        &self.rhs[row]
    }

    /// Whether the tableau has a solution.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Primary and secondary column of the octagon type, if one was declared.
    pub fn octagon(&self) -> Option<(usize, usize)> {
        self.octagon
    }

    /// Number of rows in use.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of columns, including the slack columns of the linear constraint.
    pub fn columns(&self) -> usize {
        self.origin.columns()
    }

    /// Number of columns that correspond to coordinates of the triangulation.
    pub fn coordinate_columns(&self) -> usize {
        self.origin.coordinate_columns()
    }

    /// The initial tableau this tableau derives from.
    pub fn origin(&self) -> &'a LPInitialTableaux<'a, C> {
        self.origin
    }

    /// Check the invariants of the basis.
    ///
    /// Each row in use has a basic column with a positive entry in that row, and zero entries in
    /// all other rows. If the tableau is feasible, the right hand side is non negative and the
    /// secondary column of a declared octagon type is inactive.
    pub fn verify(&self) -> bool {
        for row in 0..self.rank {
            let column = self.basis[row];
            if self.state[column] != ColumnState::Basic(row) || !self.entry(row, column).is_positive() {
                return false;
            }
            if (0..self.rank).any(|other| other != row && !self.entry(other, column).is_zero()) {
                return false;
            }
            if self.feasible && self.rhs[row].is_negative() {
                return false;
            }
        }
        let states_consistent = self.state.iter().all(|state| match *state {
            ColumnState::Basic(row) => row < self.rank,
            _ => true,
        });
        let octagon_consistent = !self.feasible || self.octagon
            .is_none_or(|(_, secondary)| !self.is_active(secondary));

        states_consistent && octagon_consistent
    }

    /// Read off the vertex solution of the tableau.
    ///
    /// All non basic variables are zero, apart from the columns that were constrained to be
    /// positive, which are one. The solution is scaled to the smallest integer vector.
    ///
    /// # Arguments
    ///
    /// * `type_vector`: For each coordinate column, in tableau order, whether `constrain_positive`
    /// was applied to it. Columns of the octagon type are handled separately.
    ///
    /// # Return value
    ///
    /// Values in the original coordinate order, `InvalidArgument` if the type vector has the
    /// wrong length.
    pub fn extract_solution(&self, type_vector: &[bool]) -> Result<Vec<I>, LPError> {
        debug_assert!(self.feasible);

        let nr_coordinates = self.origin.coordinate_columns();
        if type_vector.len() != nr_coordinates {
            return Err(LPError::invalid_argument(format!(
                "type vector has length {}, expected {}", type_vector.len(), nr_coordinates,
            )));
        }

        let mut lcm = I::one();
        for row in 0..self.rank {
            lcm = lcm.lcm_with(&self.entry(row, self.basis[row]));
        }

        let column_perm = self.origin.column_perm();
        let mut values = vec![I::zero(); nr_coordinates];
        for row in 0..self.rank {
            let column = self.basis[row];
            if column >= nr_coordinates {
                continue;
            }
            let mut value = lcm.clone();
            value.div_assign_exact(&self.entry(row, column));
            value *= &self.rhs[row];
            values[column_perm[column]] = value;
        }
        for (column, &positive) in type_vector.iter().enumerate() {
            let in_octagon = self.octagon
                .is_some_and(|(primary, secondary)| column == primary || column == secondary);
            if positive && !in_octagon {
                values[column_perm[column]] += &lcm;
            }
        }
        if let Some((primary, secondary)) = self.octagon {
            values[column_perm[primary]] += &lcm;
            values[column_perm[secondary]] = values[column_perm[primary]].clone();
        }

        let gcd = values.iter().fold(I::zero(), |gcd, value| gcd.gcd_with(value));
        if gcd > I::one() {
            for value in &mut values {
                value.div_assign_exact(&gcd);
            }
        }

        Ok(values)
    }

    /// Read off the vertex solution as a normal or almost normal surface.
    ///
    /// The two quad coordinates of a declared octagon type are replaced by the octagon.
    ///
    /// # Arguments
    ///
    /// * `type_vector`: As for `extract_solution`.
    /// * `encoding`: Encoding of the normal coordinates that the origin was built for.
    pub fn extract_surface(
        &self,
        type_vector: &[bool],
        encoding: NormalEncoding,
    ) -> Result<NormalSurface, LPError> {
        if LPSystem::new(encoding) != self.origin.system() || !self.origin.system().is_normal() {
            return Err(LPError::invalid_argument(format!(
                "encoding {:?} doesn't match the {:?} system of the tableau", encoding, self.origin.system(),
            )));
        }

        let mut coordinates = self.extract_solution(type_vector)?
            .iter()
            .map(IntType::to_big_int)
            .collect::<Vec<_>>();
        let octagon = self.octagon.map(|(primary, secondary)| {
            let quad_type = |column: usize| {
                let original = self.origin.column_perm()[column];
                if self.origin.system().is_standard() { original % 7 - 4 } else { original % 3 }
            };
            let count = std::mem::take(&mut coordinates[self.origin.column_perm()[primary]]);
            coordinates[self.origin.column_perm()[secondary]] = BigInt::zero();

            Octagon {
                tetrahedron: self.origin.tetrahedron(primary),
                kind: 3 - quad_type(primary) - quad_type(secondary),
                count,
            }
        });

        NormalSurface::new(encoding, coordinates, octagon)
    }

    /// Read off the vertex solution as an angle structure.
    ///
    /// # Arguments
    ///
    /// * `type_vector`: As for `extract_solution`.
    pub fn extract_angle_structure(&self, type_vector: &[bool]) -> Result<AngleStructure, LPError> {
        if !self.origin.system().is_angle() {
            return Err(LPError::invalid_argument("the tableau doesn't describe angle structures"));
        }

        AngleStructure::from_values(&self.extract_solution(type_vector)?)
    }
}

impl<C: LinearConstraint, I: IntType> PartialEq for LPData<'_, C, I> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.origin, other.origin)
            && self.rank == other.rank
            && self.rhs == other.rhs
            && self.row_ops == other.row_ops
            && self.basis == other.basis
            && self.state == other.state
            && self.positive == other.positive
            && self.octagon == other.octagon
            && self.feasible == other.feasible
    }
}

impl<C: LinearConstraint, I: IntType> Display for LPData<'_, C, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== LPData ===")?;
        if !self.feasible {
            return writeln!(f, "infeasible");
        }

        let columns = self.origin.columns();
        let rhs = self.rhs[..self.rank].iter().map(ToString::to_string).collect::<Vec<_>>();
        let entries = (0..self.rank)
            .map(|row| (0..columns).map(|column| self.entry(row, column).to_string()).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        let width = entries.iter().flatten()
            .chain(&rhs)
            .map(String::len)
            .chain([columns.to_string().len(), 3])
            .max()
            .unwrap_or(3);

        write!(f, "{0:>width$} | {1:^width$} |", "", "b", width = width)?;
        for column in 0..columns {
            let marker = match self.state[column] {
                ColumnState::Inactive => "x".to_string(),
                _ => column.to_string(),
            };
            write!(f, " {0:^width$}", marker, width = width)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", repeat_n("-", (columns + 2) * (width + 1) + 4).collect::<String>())?;

        for (row, values) in entries.iter().enumerate() {
            write!(f, "{0:>width$} | {1:>width$} |", self.basis[row], rhs[row], width = width)?;
            for value in values {
                write!(f, " {0:>width$}", value, width = width)?;
            }
            writeln!(f)?;
        }
        if let Some((primary, secondary)) = self.octagon {
            writeln!(f, "Octagon: {} + {}", primary, secondary)?;
        }

        Ok(())
    }
}
