//! # Matrix implementations
//!
//! Two dense matrix types are defined in this module. The `DenseMatrix` holds the matching
//! equations as they are produced from a triangulation, with machine sized coefficients. The
//! `LPMatrix` holds the row operations of a tableau, and is computed with in any `IntType`.
use std::fmt::{Display, Formatter};
use std::fmt;

use index_utils::remove_indices;
use itertools::repeat_n;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use crate::data::number_types::traits::IntType;

/// Dense integer matrix of small coefficients.
///
/// Uses a `Vec<Vec<i64>>` as underlying data structure. Dimensions are fixed at creation, apart
/// from the removal of rows.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DenseMatrix {
    data: Vec<Vec<i64>>,
    nr_rows: usize,
    nr_columns: usize,
}

impl DenseMatrix {
    /// Create a `DenseMatrix` from the provided rows.
    ///
    /// # Arguments
    ///
    /// * `data`: Rows, all of length `nr_columns`.
    /// * `nr_columns`: Number of columns, needed explicitly in case there are no rows.
    pub fn from_data(data: Vec<Vec<i64>>, nr_columns: usize) -> Self {
        debug_assert!(data.iter().all(|row| row.len() == nr_columns));

        let nr_rows = data.len();
        DenseMatrix { data, nr_rows, nr_columns }
    }

    /// Create a dense matrix of zero's of dimension `rows` x `columns`.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        let data = (0..rows).map(|_| vec![0; columns]).collect();
        DenseMatrix { data, nr_rows: rows, nr_columns: columns }
    }

    /// Get the value at coordinate (`i`, `j`).
    pub fn get_value(&self, i: usize, j: usize) -> i64 {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i][j]
    }

    /// Get all values in row `i` of this matrix.
    pub fn row(&self, i: usize) -> &[i64] {
        debug_assert!(i < self.nr_rows);

        &self.data[i]
    }

    /// Multiply row `i` with a factor `factor`.
    pub fn multiply_row(&mut self, i: usize, factor: i64) {
        debug_assert!(i < self.nr_rows);

        for value in self.data[i].iter_mut() {
            *value *= factor;
        }
    }

    /// Get the number of rows in this matrix.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Get the number of columns in this matrix.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Remove rows from the matrix.
    ///
    /// # Arguments
    ///
    /// * `indices`: Sorted, unique row indices.
    pub fn remove_rows(&mut self, indices: &[usize]) {
        debug_assert!(indices.is_sorted());
        debug_assert!(indices.iter().all(|&i| i < self.nr_rows));

        remove_indices(&mut self.data, indices);
        self.nr_rows = self.data.len();
    }

    /// Reorder the columns.
    ///
    /// # Arguments
    ///
    /// * `permutation`: Column `j` of the result is column `permutation[j]` of `self`.
    pub fn permute_columns(&self, permutation: &[usize]) -> Self {
        debug_assert_eq!(permutation.len(), self.nr_columns);

        let data = self.data.iter()
            .map(|row| permutation.iter().map(|&j| row[j]).collect())
            .collect();
        DenseMatrix { data, nr_rows: self.nr_rows, nr_columns: self.nr_columns }
    }

    /// Indices of the rows that are not a linear combination of the rows above them.
    ///
    /// Together these rows span the row space of the matrix. Elimination happens fraction free
    /// in arbitrary precision.
    ///
    /// # Return value
    ///
    /// Sorted row indices. Their count is the rank of the matrix.
    pub fn row_basis(&self) -> Vec<usize> {
        // Reduced rows that were kept, each with the column of its leading entry.
        let mut echelon: Vec<(usize, Vec<BigInt>)> = Vec::new();
        let mut kept = Vec::new();

        for (i, row) in self.data.iter().enumerate() {
            let mut reduced = row.iter().map(|&v| BigInt::from(v)).collect::<Vec<_>>();
            for (pivot_column, basis_row) in &echelon {
                if reduced[*pivot_column].is_zero() {
                    continue;
                }
                let factor = reduced[*pivot_column].clone();
                let pivot = &basis_row[*pivot_column];
                for (value, basis_value) in reduced.iter_mut().zip(basis_row) {
                    *value *= pivot;
                    *value -= &factor * basis_value;
                }
                normalize(&mut reduced);
            }
            if let Some(pivot_column) = reduced.iter().position(|v| !v.is_zero()) {
                echelon.push((pivot_column, reduced));
                kept.push(i);
            }
        }

        kept
    }

    /// Rank of the matrix.
    pub fn rank(&self) -> usize {
        self.row_basis().len()
    }
}

/// Divide a vector by the gcd of its elements.
fn normalize(vector: &mut [BigInt]) {
    let gcd = vector.iter().fold(BigInt::zero(), |gcd, v| gcd.gcd_with(v));
    if gcd > BigInt::one() {
        for value in vector.iter_mut() {
            value.div_assign_exact(&gcd);
        }
    }
}

impl Display for DenseMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = 5;
        writeln!(f, "{}", repeat_n("-", (1 + self.nr_columns) * width).collect::<String>())?;
        for row in &self.data {
            for value in row {
                write!(f, "{:>width$}", value, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Dense row major matrix used to hold the row operations of a tableau.
///
/// An `LPMatrix` is set up in two stages. Storage is allocated once with `reserve`, after which
/// the matrix can be initialized any number of times with `init_identity` or `init_clone`
/// without allocating again. The matrix can only be queried after it was initialized.
///
/// The type deliberately doesn't implement `Clone`; copies are made explicitly through
/// `init_clone` into storage that was reserved before.
#[derive(Debug)]
pub struct LPMatrix<I> {
    data: Vec<I>,
    nr_rows: usize,
    nr_columns: usize,
    max_rows: usize,
    max_columns: usize,
}

impl<I: IntType> LPMatrix<I> {
    /// Create an unreserved matrix without any storage.
    pub fn new() -> Self {
        LPMatrix { data: Vec::new(), nr_rows: 0, nr_columns: 0, max_rows: 0, max_columns: 0 }
    }

    /// Create a matrix with storage for at most `max_rows` x `max_columns` elements.
    ///
    /// Dimensions are undefined until the matrix is initialized.
    pub fn reserve(max_rows: usize, max_columns: usize) -> Self {
        LPMatrix {
            data: Vec::with_capacity(max_rows * max_columns),
            nr_rows: 0,
            nr_columns: 0,
            max_rows,
            max_columns,
        }
    }

    /// Initialize as the identity matrix of size `size`.
    pub fn init_identity(&mut self, size: usize) {
        debug_assert!(size <= self.max_rows && size <= self.max_columns);

        self.nr_rows = size;
        self.nr_columns = size;
        self.data.clear();
        self.data.extend(repeat_n(I::zero(), size * size));
        for i in 0..size {
            self.data[i * size + i] = I::one();
        }
    }

    /// Initialize as a matrix of zero's of dimension `rows` x `columns`.
    pub fn init_zero(&mut self, rows: usize, columns: usize) {
        debug_assert!(rows <= self.max_rows && columns <= self.max_columns);

        self.nr_rows = rows;
        self.nr_columns = columns;
        self.data.clear();
        self.data.extend(repeat_n(I::zero(), rows * columns));
    }

    /// Initialize as a copy of another matrix.
    pub fn init_clone(&mut self, other: &Self) {
        debug_assert!(other.nr_rows <= self.max_rows && other.nr_columns <= self.max_columns);

        self.nr_rows = other.nr_rows;
        self.nr_columns = other.nr_columns;
        if self.data.len() == other.data.len() {
            self.data.clone_from_slice(&other.data);
        } else {
            self.data.clear();
            self.data.extend_from_slice(&other.data);
        }
    }

    /// Get the number of rows in this matrix.
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Get the number of columns in this matrix.
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Read an element.
    pub fn entry(&self, row: usize, column: usize) -> &I {
        debug_assert!(row < self.nr_rows && column < self.nr_columns);

        &self.data[row * self.nr_columns + column]
    }

    /// Write an element.
    pub fn entry_mut(&mut self, row: usize, column: usize) -> &mut I {
        debug_assert!(row < self.nr_rows && column < self.nr_columns);

        &mut self.data[row * self.nr_columns + column]
    }

    /// All elements of a row.
    pub fn row(&self, row: usize) -> &[I] {
        debug_assert!(row < self.nr_rows);

        &self.data[row * self.nr_columns..(row + 1) * self.nr_columns]
    }

    /// Swap two rows, no-op when they are equal.
    pub fn swap_rows(&mut self, first: usize, second: usize) {
        debug_assert!(first < self.nr_rows && second < self.nr_rows);

        if first != second {
            let (low, high) = if first < second { (first, second) } else { (second, first) };
            let (head, tail) = self.data.split_at_mut(high * self.nr_columns);
            head[low * self.nr_columns..(low + 1) * self.nr_columns]
                .swap_with_slice(&mut tail[..self.nr_columns]);
        }
    }

    /// Replace row `dest` by `(dest_coeff * dest - src_coeff * src) / div`.
    ///
    /// # Arguments
    ///
    /// * `dest_coeff`: Factor for the row that is overwritten.
    /// * `dest`: Row that is overwritten, not equal to `src`.
    /// * `src_coeff`: Factor for the row that is subtracted.
    /// * `src`: Row that is subtracted.
    /// * `div`: Non zero, divides every element of the combination exactly.
    pub fn comb_row(&mut self, dest_coeff: &I, dest: usize, src_coeff: &I, src: usize, div: &I) {
        debug_assert_ne!(dest, src);
        debug_assert!(!div.is_zero());

        self.combine(dest_coeff, dest, src_coeff, src);
        for value in self.row_mut(dest) {
            value.div_assign_exact(div);
        }
    }

    /// Replace row `dest` by `dest_coeff * dest - src_coeff * src`, and divide it by the gcd of
    /// its elements.
    ///
    /// # Return value
    ///
    /// The gcd that was divided out. Zero if and only if the resulting row is entirely zero, in
    /// which case no division took place.
    pub fn comb_row_and_norm(&mut self, dest_coeff: &I, dest: usize, src_coeff: &I, src: usize) -> I {
        debug_assert_ne!(dest, src);

        self.combine(dest_coeff, dest, src_coeff, src);

        let gcd = self.row(dest).iter().fold(I::zero(), |gcd, value| gcd.gcd_with(value));
        if gcd > I::one() {
            for value in self.row_mut(dest) {
                value.div_assign_exact(&gcd);
            }
        }
        gcd
    }

    /// Negate each element of a row.
    pub fn negate_row(&mut self, row: usize) {
        for value in self.row_mut(row) {
            value.negate();
        }
    }

    fn row_mut(&mut self, row: usize) -> &mut [I] {
        debug_assert!(row < self.nr_rows);

        &mut self.data[row * self.nr_columns..(row + 1) * self.nr_columns]
    }

    fn combine(&mut self, dest_coeff: &I, dest: usize, src_coeff: &I, src: usize) {
        let width = self.nr_columns;
        for j in 0..width {
            let mut subtracted = self.data[src * width + j].clone();
            subtracted *= src_coeff;
            let value = &mut self.data[dest * width + j];
            *value *= dest_coeff;
            *value -= &subtracted;
        }
    }
}

impl<I: IntType> Default for LPMatrix<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: PartialEq> PartialEq for LPMatrix<I> {
    fn eq(&self, other: &Self) -> bool {
        self.nr_rows == other.nr_rows
            && self.nr_columns == other.nr_columns
            && self.data == other.data
    }
}

impl<I: Display> Display for LPMatrix<I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let width = 8;
        for i in 0..self.nr_rows {
            for j in 0..self.nr_columns {
                write!(f, "{:>width$}", self.data[i * self.nr_columns + j].to_string(), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use crate::data::linear_algebra::matrix::{DenseMatrix, LPMatrix};

    fn filled(rows: &[&[i64]]) -> LPMatrix<i64> {
        let size = rows.len();
        let mut matrix = LPMatrix::reserve(size, size);
        matrix.init_identity(size);
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                *matrix.entry_mut(i, j) = value;
            }
        }
        matrix
    }

    #[test]
    fn identity_and_clone() {
        let mut matrix = LPMatrix::<BigInt>::reserve(3, 3);
        matrix.init_identity(3);
        assert_eq!(matrix.entry(1, 1), &BigInt::from(1));
        assert_eq!(matrix.entry(1, 2), &BigInt::from(0));

        let mut copy = LPMatrix::reserve(3, 3);
        copy.init_clone(&matrix);
        assert_eq!(copy, matrix);

        *matrix.entry_mut(0, 2) = BigInt::from(5);
        copy.init_clone(&matrix);
        assert_eq!(copy.entry(0, 2), &BigInt::from(5));
    }

    #[test]
    fn swap_rows() {
        let mut matrix = filled(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        matrix.swap_rows(2, 0);
        assert_eq!(matrix.row(0), &[7, 8, 9]);
        assert_eq!(matrix.row(2), &[1, 2, 3]);
        matrix.swap_rows(1, 1);
        assert_eq!(matrix.row(1), &[4, 5, 6]);
    }

    #[test]
    fn comb_row() {
        let mut matrix = filled(&[&[2, 4, 6], &[1, 1, 1], &[0, 0, 0]]);
        // (3 * [2, 4, 6] - 2 * [1, 1, 1]) / 2
        matrix.comb_row(&3, 0, &2, 1, &2);
        assert_eq!(matrix.row(0), &[2, 5, 8]);
    }

    #[test]
    fn comb_row_and_norm() {
        let mut matrix = filled(&[&[2, 4, 6], &[1, 1, 1], &[0, 0, 0]]);
        // 2 * [2, 4, 6] - 4 * [1, 1, 1] = [0, 4, 8]
        assert_eq!(matrix.comb_row_and_norm(&2, 0, &4, 1), 4);
        assert_eq!(matrix.row(0), &[0, 1, 2]);

        assert_eq!(matrix.comb_row_and_norm(&1, 2, &0, 1), 0);
        assert_eq!(matrix.row(2), &[0, 0, 0]);

        matrix.negate_row(0);
        assert_eq!(matrix.row(0), &[0, -1, -2]);
    }

    #[test]
    fn row_basis() {
        let matrix = DenseMatrix::from_data(vec![
            vec![2, -1, -1, 2, -1, -1],
            vec![2, -1, -1, 2, -1, -1],
        ], 6);
        assert_eq!(matrix.row_basis(), vec![0]);

        let matrix = DenseMatrix::from_data(vec![
            vec![1, 0, 1],
            vec![0, 1, 1],
            vec![1, 1, 2],
            vec![0, 0, 1],
        ], 3);
        assert_eq!(matrix.row_basis(), vec![0, 1, 3]);
        assert_eq!(matrix.rank(), 3);

        assert_eq!(DenseMatrix::zeros(2, 3).row_basis(), Vec::<usize>::new());
    }

    #[test]
    fn remove_and_permute() {
        let mut matrix = DenseMatrix::from_data(vec![vec![1, 2], vec![3, 4], vec![5, 6]], 2);
        matrix.remove_rows(&[1]);
        assert_eq!(matrix.nr_rows(), 2);
        assert_eq!(matrix.row(1), &[5, 6]);

        let permuted = matrix.permute_columns(&[1, 0]);
        assert_eq!(permuted.row(0), &[2, 1]);
    }
}
