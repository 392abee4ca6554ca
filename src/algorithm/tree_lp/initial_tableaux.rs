//! # Initial tableaux
//!
//! The matching equations of a triangulation, prepared for the tree traversal: dependent rows
//! are removed, columns are reordered such that coordinates that are likely to be fixed early
//! come first, the rows of a linear constraint are appended and all columns are stored
//! sparsely.
use std::fmt::{Display, Formatter};
use std::fmt;

use cumsum::cumsum_array_owned;
use enum_map::{Enum, enum_map, EnumMap};
use log::debug;
use num_traits::One;

use crate::algorithm::tree_lp::column::LPCol;
use crate::algorithm::tree_lp::constraint::LinearConstraint;
use crate::data::encoding::{LPSystem, NormalEncoding};
use crate::data::linear_algebra::matrix::{DenseMatrix, LPMatrix};
use crate::data::number_types::traits::IntType;
use crate::data::triangulation::Triangulation;
use crate::error::LPError;

/// Groups of columns of the tableau, in the order in which they appear.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColumnType {
    /// Three per tetrahedron, quads or angles.
    Quad,
    /// Four per tetrahedron, only in the standard system.
    Triangle,
    /// The single projective coordinate of the angle system.
    Scaling,
    /// One slack column per row of the linear constraint.
    Constraint,
}

/// The starting tableau of a tree traversal.
///
/// The tableau is immutable once it is built, and is shared by all `LPData` instances of a
/// search.
///
/// Column `c` of the tableau corresponds to coordinate `column_perm()[c]` of the triangulation. The
/// quad columns of all tetrahedra come first, grouped by tetrahedron and in quad type order within
/// each tetrahedron. In the standard system they are followed by the triangle columns of the
/// tetrahedra, in the same tetrahedron order. In the angle system the scaling coordinate is the
/// last coordinate column. The slack columns of the linear constraint always come last.
pub struct LPInitialTableaux<'a, C: LinearConstraint> {
    tri: &'a dyn Triangulation,
    system: LPSystem,
    /// Rank reduced matching equations, with the columns permuted.
    equations: DenseMatrix,
    /// Number of rows, including the rows of the linear constraint.
    rank: usize,
    /// Number of columns, including the slack columns of the linear constraint.
    columns: usize,
    /// Coefficient of the scaling column in every row of the equations, zero if there is none.
    scaling: i64,
    col: Vec<LPCol<C>>,
    column_perm: Vec<usize>,
    /// Tableau column of each original coordinate.
    column_of_coordinate: Vec<usize>,
    column_group_end: EnumMap<ColumnType, usize>,
}

impl<'a, C: LinearConstraint> LPInitialTableaux<'a, C> {
    /// Build the starting tableau for a triangulation.
    ///
    /// # Arguments
    ///
    /// * `tri`: Triangulation, which needs to outlive the tableau.
    /// * `encoding`: Coordinates in which to work.
    /// * `enumeration`: Whether the tableau is used to enumerate all vertex solutions, as opposed
    /// to finding a single solution. Only if so, the tetrahedra are reordered.
    ///
    /// # Return value
    ///
    /// `InvalidArgument` if the linear constraint doesn't support the encoding or the
    /// triangulation, or if the matching equations are not of the expected form.
    pub fn new(
        tri: &'a dyn Triangulation,
        encoding: NormalEncoding,
        enumeration: bool,
    ) -> Result<Self, LPError> {
        if !C::supported(encoding) {
            return Err(LPError::invalid_argument(format!(
                "the linear constraint does not support the encoding {:?}", encoding,
            )));
        }

        let system = LPSystem::new(encoding);
        let size = tri.size();
        let nr_coordinates = system.coords(size);
        let mut equations = tri.matching_equations(system)?;
        if equations.nr_columns() != nr_coordinates {
            return Err(LPError::invalid_argument(format!(
                "expected matching equations with {} columns, got {}",
                nr_coordinates, equations.nr_columns(),
            )));
        }

        let scaling = if system.is_angle() {
            Self::scale_angle_equations(&mut equations)?
        } else {
            0
        };

        Self::keep_row_basis(&mut equations);
        let nr_equations = equations.nr_rows();

        let order = Self::tetrahedron_order(tri, system, &equations, enumeration)?;
        let nr_constraints = C::nr_constraints();
        let columns = nr_coordinates + nr_constraints;
        let column_perm = Self::build_column_perm(system, &order, nr_coordinates, nr_constraints);
        let mut column_of_coordinate = vec![0; columns];
        for (column, &original) in column_perm.iter().enumerate() {
            column_of_coordinate[original] = column;
        }
        let equations = equations.permute_columns(&column_perm[..nr_coordinates]);

        let mut col = vec![LPCol::new(); columns];
        let nr_sparse = if system.is_angle() { nr_coordinates - 1 } else { nr_coordinates };
        for (j, column) in col.iter_mut().enumerate().take(nr_sparse) {
            for i in 0..nr_equations {
                let value = equations.get_value(i, j);
                if value != 0 {
                    column.push(i, value)?;
                }
            }
        }
        C::add_rows(&mut col, tri, system, &column_perm)?;
        for k in 0..nr_constraints {
            col[nr_coordinates + k].extra.as_mut()[k] = -C::Coefficient::one();
        }

        let cumulative = cumsum_array_owned([
            3 * size,
            if system.is_standard() { 4 * size } else { 0 },
            if system.is_angle() { 1 } else { 0 },
            nr_constraints,
        ]);
        let column_group_end = enum_map!{
            ColumnType::Quad       => cumulative[0],
            ColumnType::Triangle   => cumulative[1],
            ColumnType::Scaling    => cumulative[2],
            ColumnType::Constraint => cumulative[3],
        };
        debug_assert_eq!(column_group_end[ColumnType::Constraint], columns);

        let rank = nr_equations + nr_constraints;
        debug!(
            "Initial tableaux for {:?} system of {} tetrahedra: rank {}, {} columns",
            system, size, rank, columns,
        );

        Ok(LPInitialTableaux {
            tri,
            system,
            equations,
            rank,
            columns,
            scaling,
            col,
            column_perm,
            column_of_coordinate,
            column_group_end,
        })
    }

    /// Multiply the angle equations such that the scaling column has the same coefficient in
    /// every row.
    ///
    /// # Return value
    ///
    /// The common scaling coefficient, which is minus the least common multiple of the original
    /// coefficients.
    fn scale_angle_equations(equations: &mut DenseMatrix) -> Result<i64, LPError> {
        let last = equations.nr_columns() - 1;
        let mut lcm = 1_i64;
        for i in 0..equations.nr_rows() {
            let value = equations.get_value(i, last);
            if value == 0 {
                return Err(LPError::invalid_argument(format!(
                    "angle equation {} has no scaling coefficient", i,
                )));
            }
            lcm = lcm.lcm_with(&value.abs());
        }
        let scaling = -lcm;
        for i in 0..equations.nr_rows() {
            let factor = scaling / equations.get_value(i, last);
            equations.multiply_row(i, factor);
        }

        Ok(scaling)
    }

    /// Remove the rows that are linear combinations of earlier rows.
    fn keep_row_basis(equations: &mut DenseMatrix) {
        let basis = equations.row_basis();
        let mut basis_iter = basis.iter().peekable();
        let mut dependent = Vec::with_capacity(equations.nr_rows() - basis.len());
        for i in 0..equations.nr_rows() {
            if basis_iter.peek() == Some(&&i) {
                basis_iter.next();
            } else {
                dependent.push(i);
            }
        }
        equations.remove_rows(&dependent);
    }

    /// Order in which the tetrahedra appear in the tableau.
    fn tetrahedron_order(
        tri: &dyn Triangulation,
        system: LPSystem,
        equations: &DenseMatrix,
        enumeration: bool,
    ) -> Result<Vec<usize>, LPError> {
        let size = tri.size();
        if system.is_angle() || !enumeration || cfg!(feature = "no-reorder") {
            return Ok((0..size).collect());
        }

        let order = if system.is_standard() {
            // The quadrilateral equations describe the structure of the problem better than the
            // standard ones, which are dominated by the triangles.
            let mut quad_equations = tri.matching_equations(LPSystem::Quad)?;
            Self::keep_row_basis(&mut quad_equations);
            row_sweep_order(&quad_equations, size, |t, q| 3 * t + q)
        } else {
            row_sweep_order(equations, size, |t, q| 3 * t + q)
        };
        Ok(order)
    }

    /// Permutation from tableau columns to original coordinates.
    fn build_column_perm(
        system: LPSystem,
        order: &[usize],
        nr_coordinates: usize,
        nr_constraints: usize,
    ) -> Vec<usize> {
        let mut perm = Vec::with_capacity(nr_coordinates + nr_constraints);
        match system {
            LPSystem::Angle => perm.extend(0..nr_coordinates),
            LPSystem::Quad => perm.extend(order.iter().flat_map(|&t| (0..3).map(move |q| 3 * t + q))),
            LPSystem::Standard => {
                perm.extend(order.iter().flat_map(|&t| (0..3).map(move |q| 7 * t + 4 + q)));
                perm.extend(order.iter().flat_map(|&t| (0..4).map(move |v| 7 * t + v)));
            },
        }
        perm.extend(nr_coordinates..nr_coordinates + nr_constraints);
        debug_assert_eq!(perm.len(), nr_coordinates + nr_constraints);

        perm
    }

    /// Inner product of a row of `m` with column `c` of this tableau.
    ///
    /// # Arguments
    ///
    /// * `m`: Matrix with at least `rank()` columns.
    /// * `m_row`: Row of `m`.
    /// * `c`: Column of the tableau.
    pub fn mult_col_by_row<I: IntType>(&self, m: &LPMatrix<I>, m_row: usize, c: usize) -> I {
        self.mult(m, m_row, c, 0)
    }

    /// Same as `mult_col_by_row`, but with `C::OCT_ADJUSTMENT` added to each coefficient in the
    /// rows of the linear constraint.
    ///
    /// Never called for the scaling column.
    pub fn mult_col_by_row_oct<I: IntType>(&self, m: &LPMatrix<I>, m_row: usize, c: usize) -> I {
        debug_assert!(!self.is_scaling(c));

        self.mult(m, m_row, c, C::OCT_ADJUSTMENT)
    }

    fn mult<I: IntType>(&self, m: &LPMatrix<I>, m_row: usize, c: usize, adjustment: i64) -> I {
        debug_assert!(c < self.columns);

        let row = m.row(m_row);
        if self.is_scaling(c) {
            let mut total = I::zero();
            for value in &row[..self.rank] {
                total += value;
            }
            total.mul_small(self.scaling);
            return total;
        }

        let column = &self.col[c];
        let mut total = I::zero();
        for &i in column.plus() {
            total += &row[i];
        }
        for &i in column.minus() {
            total -= &row[i];
        }
        let nr_equations = self.nr_equations();
        for (k, &coefficient) in column.extra.as_ref().iter().enumerate() {
            let coefficient = Into::<i64>::into(coefficient) + adjustment;
            if coefficient != 0 {
                let mut term = row[nr_equations + k].clone();
                term.mul_small(coefficient);
                total += &term;
            }
        }

        total
    }

    /// Write the full tableau as a dense matrix.
    ///
    /// # Arguments
    ///
    /// * `m`: Reserved for at least `rank()` x `columns()` elements.
    pub fn fill_initial_tableaux<I: IntType>(&self, m: &mut LPMatrix<I>) {
        m.init_zero(self.rank, self.columns);

        let nr_equations = self.nr_equations();
        for (j, column) in self.col.iter().enumerate() {
            if self.is_scaling(j) {
                for i in 0..self.rank {
                    *m.entry_mut(i, j) = I::from(self.scaling);
                }
                continue;
            }
            for &i in column.plus() {
                *m.entry_mut(i, j) += &I::one();
            }
            for &i in column.minus() {
                *m.entry_mut(i, j) -= &I::one();
            }
            for (k, &coefficient) in column.extra.as_ref().iter().enumerate() {
                *m.entry_mut(nr_equations + k, j) = I::from(Into::<i64>::into(coefficient));
            }
        }
    }

    /// Triangulation the tableau was built for.
    pub fn tri(&self) -> &'a dyn Triangulation {
        self.tri
    }

    /// Class of matching equations.
    pub fn system(&self) -> LPSystem {
        self.system
    }

    /// Number of rows, including those of the linear constraint.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Number of independent matching equations.
    pub fn nr_equations(&self) -> usize {
        self.rank - C::nr_constraints()
    }

    /// Number of columns, including the slack columns of the linear constraint.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of columns that correspond to coordinates of the triangulation.
    pub fn coordinate_columns(&self) -> usize {
        self.columns - C::nr_constraints()
    }

    /// Common coefficient of the scaling column, zero for normal surface systems.
    pub fn scaling(&self) -> i64 {
        self.scaling
    }

    /// Whether column `c` is the scaling column.
    pub fn is_scaling(&self, c: usize) -> bool {
        self.scaling != 0 && c + 1 == self.coordinate_columns()
    }

    /// Original coordinate of each column.
    pub fn column_perm(&self) -> &[usize] {
        &self.column_perm
    }

    /// Tableau column of an original coordinate.
    pub fn column_of_coordinate(&self, coordinate: usize) -> usize {
        self.column_of_coordinate[coordinate]
    }

    /// Sparse column `c`.
    pub fn column(&self, c: usize) -> &LPCol<C> {
        &self.col[c]
    }

    /// The rank reduced matching equations, in tableau column order.
    pub fn equations(&self) -> &DenseMatrix {
        &self.equations
    }

    /// Group that a column belongs to.
    pub fn column_type(&self, c: usize) -> ColumnType {
        debug_assert!(c < self.columns);

        if c < self.column_group_end[ColumnType::Quad] {
            ColumnType::Quad
        } else if c < self.column_group_end[ColumnType::Triangle] {
            ColumnType::Triangle
        } else if c < self.column_group_end[ColumnType::Scaling] {
            ColumnType::Scaling
        } else {
            ColumnType::Constraint
        }
    }

    /// Tetrahedron of a quad or triangle column.
    pub fn tetrahedron(&self, c: usize) -> usize {
        let original = self.column_perm[c];
        match self.system {
            LPSystem::Standard => original / 7,
            LPSystem::Quad | LPSystem::Angle => original / 3,
        }
    }
}

/// Order the tetrahedra by sweeping through the equations.
///
/// Repeatedly the equation that touches the fewest tetrahedra not seen before is selected, and
/// the new tetrahedra it touches are placed at the back of the order. That way the tetrahedra of
/// sparse equations end up at the end, and the search fixes the better connected part of the
/// triangulation first. Tetrahedra that appear in no equation come last.
fn row_sweep_order(
    equations: &DenseMatrix,
    size: usize,
    quad_column: impl Fn(usize, usize) -> usize,
) -> Vec<usize> {
    let touches = |row: usize, t: usize| (0..3).any(|q| equations.get_value(row, quad_column(t, q)) != 0);

    let mut used = vec![false; equations.nr_rows()];
    let mut touched = vec![false; size];
    let mut order = vec![0; size];
    let mut nr_touched = 0;
    for _ in 0..equations.nr_rows() {
        let best_row = (0..equations.nr_rows())
            .filter(|&row| !used[row])
            .min_by_key(|&row| (0..size).filter(|&t| !touched[t] && touches(row, t)).count());
        let Some(best_row) = best_row else { break };

        used[best_row] = true;
        for t in 0..size {
            if !touched[t] && touches(best_row, t) {
                touched[t] = true;
                order[size - nr_touched - 1] = t;
                nr_touched += 1;
            }
        }
    }
    for t in 0..size {
        if !touched[t] {
            touched[t] = true;
            order[size - nr_touched - 1] = t;
            nr_touched += 1;
        }
    }

    order
}

impl<C: LinearConstraint> Display for LPInitialTableaux<'_, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?} system, rank {}, {} columns", self.system, self.rank, self.columns)?;
        writeln!(f, "Column permutation: {:?}", self.column_perm)?;
        write!(f, "{}", self.equations)
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use crate::algorithm::tree_lp::constraint::{EulerPositive, EulerZero, NoConstraint};
    use crate::algorithm::tree_lp::initial_tableaux::{ColumnType, LPInitialTableaux};
    use crate::data::encoding::{LPSystem, NormalEncoding};
    use crate::data::linear_algebra::matrix::{DenseMatrix, LPMatrix};
    use crate::data::triangulation::Triangulation;
    use crate::tests::{figure_eight, one_vertex_sphere};

    #[test]
    fn one_tetrahedron() {
        let tri = one_vertex_sphere();
        let tableaux = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::STANDARD, true).unwrap();
        assert_eq!(tableaux.system(), LPSystem::Standard);
        assert_eq!(tableaux.rank(), 4);
        assert_eq!(tableaux.columns(), 7);
        assert_eq!(tableaux.coordinate_columns(), 7);
        assert_eq!(tableaux.column_perm(), &[4, 5, 6, 0, 1, 2, 3]);
        assert_eq!(tableaux.column_of_coordinate(0), 3);
        assert_eq!(tableaux.scaling(), 0);
        assert_eq!(tableaux.column_type(2), ColumnType::Quad);
        assert_eq!(tableaux.column_type(3), ColumnType::Triangle);
    }

    #[test]
    fn euler_constraint_columns() {
        let tri = one_vertex_sphere();
        let tableaux = LPInitialTableaux::<EulerPositive>::new(&tri, NormalEncoding::STANDARD, true).unwrap();
        assert_eq!(tableaux.rank(), 5);
        assert_eq!(tableaux.columns(), 8);
        assert_eq!(tableaux.coordinate_columns(), 7);
        assert_eq!(tableaux.column_type(7), ColumnType::Constraint);
        assert_eq!(tableaux.column(7).extra, [-1]);
        // Coefficients follow the permuted coordinates.
        let euler = [2, 0, 1, -1, 0, 0, 1];
        for c in 0..7 {
            assert_eq!(tableaux.column(c).extra[0] as i64, euler[tableaux.column_perm()[c]]);
        }

        assert!(LPInitialTableaux::<EulerZero>::new(&tri, NormalEncoding::AN_STANDARD, true).is_err());
        assert!(LPInitialTableaux::<EulerPositive>::new(&tri, NormalEncoding::QUAD, true).is_err());
    }

    #[test]
    fn figure_eight_permutations() {
        let tri = figure_eight();

        let quad = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, true).unwrap();
        assert_eq!(quad.rank(), 1);
        assert_eq!(quad.coordinate_columns(), 6);
        assert_eq!(quad.column_perm(), &[3, 4, 5, 0, 1, 2]);
        assert_eq!(quad.tetrahedron(0), 1);

        let natural = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::QUAD, false).unwrap();
        assert_eq!(natural.column_perm(), &[0, 1, 2, 3, 4, 5]);

        let standard = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::STANDARD, false).unwrap();
        assert_eq!(standard.rank(), 10);
        assert_eq!(standard.column_perm(), &[4, 5, 6, 11, 12, 13, 0, 1, 2, 3, 7, 8, 9, 10]);
    }

    #[test]
    fn angle_scaling() {
        let tri = figure_eight();
        let tableaux = LPInitialTableaux::<NoConstraint>::new(&tri, NormalEncoding::ANGLE, true).unwrap();
        assert_eq!(tableaux.coordinate_columns(), 7);
        assert_eq!(tableaux.rank(), 3);
        assert_eq!(tableaux.scaling(), -2);
        assert!(tableaux.is_scaling(6));
        assert!(!tableaux.is_scaling(5));
        assert_eq!(tableaux.column_type(6), ColumnType::Scaling);
        for i in 0..tableaux.equations().nr_rows() {
            assert_eq!(tableaux.equations().get_value(i, 6), -2);
        }
    }

    #[test]
    fn dense_tableaux_spans_equations() {
        let tri = figure_eight();
        for encoding in [NormalEncoding::STANDARD, NormalEncoding::QUAD, NormalEncoding::ANGLE] {
            let tableaux = LPInitialTableaux::<NoConstraint>::new(&tri, encoding, true).unwrap();
            let mut dense = LPMatrix::<BigInt>::reserve(tableaux.rank(), tableaux.columns());
            tableaux.fill_initial_tableaux(&mut dense);

            let original = tri.matching_equations(LPSystem::new(encoding)).unwrap();
            let mut rows = Vec::new();
            for i in 0..dense.nr_rows() {
                let mut row = vec![0; tableaux.columns()];
                for c in 0..tableaux.columns() {
                    row[tableaux.column_perm()[c]] = i64::try_from(dense.entry(i, c)).unwrap();
                }
                rows.push(row);
            }
            let reduced = DenseMatrix::from_data(rows.clone(), tableaux.columns());
            assert_eq!(reduced.rank(), tableaux.rank());
            assert_eq!(original.rank(), tableaux.rank());
            // Adding the original equations doesn't increase the rank.
            for i in 0..original.nr_rows() {
                rows.push(original.row(i).to_vec());
            }
            assert_eq!(DenseMatrix::from_data(rows, tableaux.columns()).rank(), tableaux.rank());
        }
    }

    #[test]
    fn mult_col_by_row() {
        let tri = one_vertex_sphere();
        let tableaux = LPInitialTableaux::<EulerPositive>::new(&tri, NormalEncoding::STANDARD, true).unwrap();
        let mut identity = LPMatrix::<i64>::reserve(5, 5);
        identity.init_identity(5);
        let mut dense = LPMatrix::<i64>::reserve(5, 8);
        tableaux.fill_initial_tableaux(&mut dense);

        for i in 0..5 {
            for c in 0..8 {
                assert_eq!(tableaux.mult_col_by_row(&identity, i, c), *dense.entry(i, c));
                let adjustment = if i == 4 { -1 } else { 0 };
                assert_eq!(tableaux.mult_col_by_row_oct(&identity, i, c), *dense.entry(i, c) + adjustment);
            }
        }
    }
}
