use serde::{Deserialize, Serialize};

use crate::error::{LinealError, Result};
use crate::shape::Shape;
use crate::traits::{sealed::EntryAt, MatrixRepr};

/// A matrix whose every entry is zero. Stores its shape only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZeroMatrix {
    shape: Shape,
}

impl ZeroMatrix {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::with_shape(Shape::new(rows, cols)?))
    }

    pub fn square(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    pub fn with_shape(shape: Shape) -> Self {
        Self { shape }
    }

    /// Validates that a row-major buffer of the given shape is all zeros.
    pub fn from_elements(rows: usize, cols: usize, elements: &[f64]) -> Result<Self> {
        let shape = Shape::new(rows, cols)?;
        shape.check_len(elements.len())?;
        check_all_zero(elements.iter().copied())?;
        Ok(Self { shape })
    }

    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        let shape = Shape::of_grid(grid)?;
        check_all_zero(grid.iter().flatten().copied())?;
        Ok(Self { shape })
    }

    pub fn transposed(&self) -> Self {
        Self {
            shape: self.shape.transposed(),
        }
    }
}

fn check_all_zero(mut values: impl Iterator<Item = f64>) -> Result<()> {
    match values.position(|v| v != 0.0) {
        Some(at) => Err(LinealError::InvalidContent(format!(
            "Zero matrix has a nonzero entry at offset {}",
            at
        ))),
        None => Ok(()),
    }
}

impl EntryAt for ZeroMatrix {
    fn entry_at(&self, _row: usize, _col: usize) -> f64 {
        0.0
    }
}

impl MatrixRepr for ZeroMatrix {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn to_dense(&self) -> Vec<f64> {
        vec![0.0; self.shape.len()]
    }

    fn diagonal_entries(&self) -> Vec<f64> {
        vec![0.0; self.shape.min_dim()]
    }

    fn is_diagonal(&self) -> bool {
        true
    }

    fn rank(&self) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Axis;

    #[test]
    fn test_zero_matrix_new() {
        let z = ZeroMatrix::new(2, 3).unwrap();
        assert_eq!(z.dims(), (2, 3));
        assert!(z.is_diagonal());
        assert!(!z.is_square());
        assert_eq!(z.rank(), 0);
        assert_eq!(z.to_dense(), vec![0.0; 6]);
        assert_eq!(z.diagonal_entries(), vec![0.0, 0.0]);
        assert!(matches!(
            ZeroMatrix::new(0, 3),
            Err(LinealError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_zero_matrix_from_data() {
        assert!(ZeroMatrix::from_elements(2, 2, &[0.0, -0.0, 0.0, 0.0]).is_ok());
        assert!(matches!(
            ZeroMatrix::from_elements(2, 2, &[0.0, 0.0, 1.0, 0.0]),
            Err(LinealError::InvalidContent(_))
        ));
        assert!(matches!(
            ZeroMatrix::from_elements(2, 2, &[0.0, 0.0, 0.0]),
            Err(LinealError::InvalidDimensions(_))
        ));

        let z = ZeroMatrix::from_rows(&[vec![0.0, 0.0, 0.0]]).unwrap();
        assert!(z.is_row_vector());
        assert!(ZeroMatrix::from_rows(&[vec![0.0], vec![f64::NAN]]).is_err());
    }

    #[test]
    fn test_zero_matrix_access() {
        let z = ZeroMatrix::new(3, 2).unwrap();
        assert!(!z.is_column_vector());
        assert_eq!(z.row(2).unwrap(), vec![0.0, 0.0]);
        assert_eq!(z.column(1).unwrap(), vec![0.0, 0.0, 0.0]);
        assert_eq!(
            z.row(3),
            Err(LinealError::IndexOutOfBounds {
                axis: Axis::Row,
                index: 3,
                bound: 3
            })
        );
        assert_eq!(z.get(2, 1), Some(0.0));
        assert_eq!(z.get(2, 2), None);
        assert_eq!(z.transposed().dims(), (2, 3));
    }
}
