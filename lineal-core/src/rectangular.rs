use serde::{Deserialize, Serialize};

use crate::dense::{DenseParts, DenseStorage};
use crate::elimination::Elimination;
use crate::error::{LinealError, Result};
use crate::shape::Shape;
use crate::traits::{sealed::EntryAt, MatrixRepr};

/// A general `r x c` matrix with `r != c`, stored densely in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DenseParts", into = "DenseParts")]
pub struct RectangularMatrix {
    storage: DenseStorage,
}

impl RectangularMatrix {
    pub fn new(rows: usize, cols: usize, elements: Vec<f64>) -> Result<Self> {
        Self::from_storage(DenseStorage::new(Shape::new(rows, cols)?, elements)?)
    }

    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        Self::from_storage(DenseStorage::from_grid(grid)?)
    }

    fn from_storage(storage: DenseStorage) -> Result<Self> {
        let shape = storage.shape();
        if shape.is_square() {
            return Err(LinealError::InvalidContent(format!(
                "{} data belongs in a square matrix",
                shape
            )));
        }
        Ok(Self { storage })
    }

    pub(crate) fn wrap(storage: DenseStorage) -> Self {
        debug_assert!(!storage.shape().is_square());
        Self { storage }
    }

    pub(crate) fn storage(&self) -> &DenseStorage {
        &self.storage
    }

    /// Row-major elements.
    pub fn elements(&self) -> &[f64] {
        self.storage.data()
    }

    /// Raw bytes of the row-major buffer, in native endianness.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.storage.data())
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            storage: self.storage.map(f),
        }
    }

    pub(crate) fn scale_rows(&self, factors: &[f64]) -> Self {
        Self {
            storage: self.storage.scale_rows(factors),
        }
    }

    pub(crate) fn scale_cols(&self, factors: &[f64]) -> Self {
        Self {
            storage: self.storage.scale_cols(factors),
        }
    }

    pub fn transposed(&self) -> Self {
        Self {
            storage: self.storage.transposed(),
        }
    }

    pub fn rank_with(&self, elimination: &Elimination) -> usize {
        elimination.rank(self.storage.shape(), self.storage.data())
    }
}

impl TryFrom<DenseParts> for RectangularMatrix {
    type Error = LinealError;

    fn try_from(parts: DenseParts) -> Result<Self> {
        Self::from_storage(DenseStorage::try_from(parts)?)
    }
}

impl From<RectangularMatrix> for DenseParts {
    fn from(rectangular: RectangularMatrix) -> Self {
        rectangular.storage.into()
    }
}

impl EntryAt for RectangularMatrix {
    fn entry_at(&self, row: usize, col: usize) -> f64 {
        self.storage.get(row, col)
    }
}

impl MatrixRepr for RectangularMatrix {
    fn shape(&self) -> Shape {
        self.storage.shape()
    }

    fn to_dense(&self) -> Vec<f64> {
        self.storage.data().to_vec()
    }

    fn rank(&self) -> usize {
        self.rank_with(&Elimination::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_construction() {
        let m = RectangularMatrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.dims(), (2, 3));
        assert!(matches!(
            RectangularMatrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]),
            Err(LinealError::InvalidContent(_))
        ));
        assert!(matches!(
            RectangularMatrix::new(2, 3, vec![1.0, 2.0]),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(matches!(
            RectangularMatrix::new(0, 3, vec![]),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(matches!(
            RectangularMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]),
            Err(LinealError::InvalidContent(_))
        ));
    }

    #[test]
    fn test_rectangular_vectors() {
        let row = RectangularMatrix::from_rows(&[vec![1.0, 2.0, 3.0]]).unwrap();
        let col = RectangularMatrix::from_rows(&[vec![1.0], vec![2.0]]).unwrap();
        assert!(row.is_row_vector() && !row.is_column_vector());
        assert!(col.is_column_vector() && !col.is_row_vector());
    }

    #[test]
    fn test_rectangular_access() {
        let m = RectangularMatrix::from_rows(&[
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
        ])
        .unwrap();
        assert_eq!(m.row(1).unwrap(), vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(m.column(2).unwrap(), vec![3.0, 7.0]);
        assert!(m.column(4).is_err());
        assert_eq!(m.diagonal_entries(), vec![1.0, 6.0]);
        assert!(!m.is_diagonal());

        let t = m.transposed();
        assert_eq!(t.dims(), (4, 2));
        assert_eq!(t.row(3).unwrap(), vec![4.0, 8.0]);
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn test_rectangular_rank() {
        let m = RectangularMatrix::from_rows(&[
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
        ])
        .unwrap();
        assert_eq!(m.rank(), 1);
        let diag_like = RectangularMatrix::from_rows(&[
            vec![3.0, 0.0, 0.0],
            vec![0.0, 2.0, 0.0],
        ])
        .unwrap();
        assert!(diag_like.is_diagonal());
        assert_eq!(diag_like.rank(), 2);
    }
}
