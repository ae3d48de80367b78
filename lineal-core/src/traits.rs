use std::fmt::Debug;

use crate::error::{Axis, LinealError, Result};
use crate::shape::Shape;

pub(crate) mod sealed {
    /// Unchecked entry lookup. Callers stay within the matrix shape.
    pub trait EntryAt {
        fn entry_at(&self, row: usize, col: usize) -> f64;
    }
}

use sealed::EntryAt;

/// Read-only capabilities shared by every matrix representation.
///
/// Implementors provide their shape and entry lookup; the remaining methods
/// have dense-scan defaults that compact representations override with
/// constant-time answers. The trait is sealed to the representations of this crate.
pub trait MatrixRepr: Debug + EntryAt {
    /// Returns the shape of the matrix.
    fn shape(&self) -> Shape;

    /// Entry at `(row, col)`, or `IndexOutOfBounds` outside the shape.
    fn entry(&self, row: usize, col: usize) -> Result<f64> {
        let (rows, cols) = self.dims();
        if row >= rows {
            return Err(LinealError::IndexOutOfBounds {
                axis: Axis::Row,
                index: row,
                bound: rows,
            });
        }
        if col >= cols {
            return Err(LinealError::IndexOutOfBounds {
                axis: Axis::Column,
                index: col,
                bound: cols,
            });
        }
        Ok(self.entry_at(row, col))
    }

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize) {
        self.shape().dims()
    }

    fn rows(&self) -> usize {
        self.shape().rows()
    }

    fn cols(&self) -> usize {
        self.shape().cols()
    }

    fn is_square(&self) -> bool {
        self.shape().is_square()
    }

    /// True for a `1 x n` matrix with `n > 1`.
    fn is_row_vector(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == 1 && cols > 1
    }

    /// True for an `n x 1` matrix with `n > 1`.
    fn is_column_vector(&self) -> bool {
        let (rows, cols) = self.dims();
        rows > 1 && cols == 1
    }

    /// Like [`MatrixRepr::entry`], with `None` outside the shape.
    fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.entry(row, col).ok()
    }

    /// The dense expansion in row-major order.
    fn to_dense(&self) -> Vec<f64> {
        let (rows, cols) = self.dims();
        let mut out = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            out.extend((0..cols).map(|c| self.entry_at(r, c)));
        }
        out
    }

    fn row(&self, index: usize) -> Result<Vec<f64>> {
        let (rows, cols) = self.dims();
        if index >= rows {
            return Err(LinealError::IndexOutOfBounds {
                axis: Axis::Row,
                index,
                bound: rows,
            });
        }
        Ok((0..cols).map(|c| self.entry_at(index, c)).collect())
    }

    fn column(&self, index: usize) -> Result<Vec<f64>> {
        let (rows, cols) = self.dims();
        if index >= cols {
            return Err(LinealError::IndexOutOfBounds {
                axis: Axis::Column,
                index,
                bound: cols,
            });
        }
        Ok((0..rows).map(|r| self.entry_at(r, index)).collect())
    }

    /// The `min(rows, cols)` entries of the main diagonal.
    fn diagonal_entries(&self) -> Vec<f64> {
        (0..self.shape().min_dim())
            .map(|i| self.entry_at(i, i))
            .collect()
    }

    /// True when every entry off the main diagonal is zero.
    fn is_diagonal(&self) -> bool {
        let (rows, cols) = self.dims();
        (0..rows).all(|r| (0..cols).all(|c| r == c || self.entry_at(r, c) == 0.0))
    }

    /// Number of linearly independent rows.
    fn rank(&self) -> usize;
}

/// Capabilities that only make sense for square matrices.
pub trait SquareRepr: MatrixRepr {
    /// Side length `n` of the `n x n` matrix.
    fn size(&self) -> usize {
        self.rows()
    }

    fn is_symmetric(&self) -> bool {
        let n = self.size();
        (0..n).all(|r| (r + 1..n).all(|c| self.entry_at(r, c) == self.entry_at(c, r)))
    }

    /// True when every entry above the main diagonal is zero.
    fn is_lower_triangular(&self) -> bool {
        let n = self.size();
        (0..n).all(|r| (r + 1..n).all(|c| self.entry_at(r, c) == 0.0))
    }

    /// True when every entry below the main diagonal is zero.
    fn is_upper_triangular(&self) -> bool {
        let n = self.size();
        (1..n).all(|r| (0..r).all(|c| self.entry_at(r, c) == 0.0))
    }

    fn determinant(&self) -> f64;
}
