//! Dense two-dimensional matrix of reals.
//!
//! A thin newtype around `nalgebra::DMatrix<f64>`, indexed as
//! `m[(row, col)]`. Lattice code uses it as an arena addressed by
//! `(depth, state)`; finite-difference code as a `(time step, node)` grid.

use nalgebra::DMatrix;
use om_core::{Error, Real, Result};
use std::ops::{Index, IndexMut};

/// A dynamically-sized 2D matrix of `Real` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Bounds-checked element access.
    pub fn get(&self, row: usize, col: usize) -> Result<Real> {
        if row >= self.rows() {
            return Err(Error::IndexOutOfRange {
                index: row,
                size: self.rows(),
            });
        }
        if col >= self.cols() {
            return Err(Error::IndexOutOfRange {
                index: col,
                size: self.cols(),
            });
        }
        Ok(self.0[(row, col)])
    }

    /// Overwrite row `i` with `values` (extra columns are left untouched).
    pub fn set_row(&mut self, i: usize, values: &[Real]) {
        for (j, &v) in values.iter().enumerate().take(self.cols()) {
            self.0[(i, j)] = v;
        }
    }

    /// Sum of the first `len` entries of row `i`.
    pub fn row_sum(&self, i: usize, len: usize) -> Real {
        (0..len.min(self.cols())).map(|j| self.0[(i, j)]).sum()
    }

    /// `true` if every entry is finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_is_row_then_column() {
        let mut m = Matrix::zeros(2, 3);
        m[(0, 2)] = 3.0;
        m[(1, 0)] = 4.0;
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(0, 0)], 0.0);
    }

    #[test]
    fn get_checks_bounds() {
        let m = Matrix::zeros(2, 3);
        assert_eq!(m.get(1, 2), Ok(0.0));
        assert_eq!(m.get(2, 0), Err(Error::IndexOutOfRange { index: 2, size: 2 }));
        assert_eq!(m.get(0, 3), Err(Error::IndexOutOfRange { index: 3, size: 3 }));
    }

    #[test]
    fn set_row_copies_values() {
        let mut m = Matrix::zeros(2, 3);
        m.set_row(1, &[7.0, 8.0, 9.0, 10.0]);
        assert_eq!(m.row_sum(1, 3), 24.0);
        assert_eq!(m[(1, 2)], 9.0);
        assert_eq!(m.row_sum(0, 3), 0.0);
    }

    #[test]
    fn row_sum_respects_length() {
        let mut m = Matrix::zeros(1, 4);
        m[(0, 0)] = 1.0;
        m[(0, 1)] = 2.0;
        m[(0, 3)] = 10.0;
        assert_eq!(m.row_sum(0, 2), 3.0);
        assert_eq!(m.row_sum(0, 10), 13.0);
    }

    #[test]
    fn non_finite_entries_are_detected() {
        let mut m = Matrix::zeros(2, 2);
        assert!(m.is_finite());
        m[(1, 1)] = Real::NAN;
        assert!(!m.is_finite());
    }
}
