use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LinealError, Result};

/// The (rows, columns) extent of a matrix. Both dimensions are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShape")]
pub struct Shape {
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct RawShape {
    rows: usize,
    cols: usize,
}

impl TryFrom<RawShape> for Shape {
    type Error = LinealError;

    fn try_from(raw: RawShape) -> Result<Self> {
        Shape::new(raw.rows, raw.cols)
    }
}

impl Shape {
    /// Creates a shape, rejecting zero dimensions and element counts that overflow `usize`.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(LinealError::InvalidDimensions(format!(
                "Dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if rows.checked_mul(cols).is_none() {
            return Err(LinealError::InvalidDimensions(format!(
                "Element count of {}x{} overflows",
                rows, cols
            )));
        }
        Ok(Self { rows, cols })
    }

    pub fn square(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    /// Infers an `n x n` shape from a flat element count, which must be a positive perfect square.
    pub fn square_from_len(len: usize) -> Result<Self> {
        let n = (len as f64).sqrt().round() as usize;
        if len == 0 || n * n != len {
            return Err(LinealError::InvalidDimensions(format!(
                "Data length ({}) is not a positive perfect square",
                len
            )));
        }
        Ok(Self { rows: n, cols: n })
    }

    /// Infers the shape of a row-of-rows grid, rejecting empty and ragged input.
    pub fn of_grid(grid: &[Vec<f64>]) -> Result<Self> {
        let cols = grid.first().map_or(0, |row| row.len());
        let shape = Self::new(grid.len(), cols)?;
        if let Some((r, row)) = grid.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(LinealError::InvalidDimensions(format!(
                "Row {} has {} entries, expected {}",
                r,
                row.len(),
                cols
            )));
        }
        Ok(shape)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Number of entries in the dense expansion.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Length of the main diagonal.
    pub fn min_dim(&self) -> usize {
        self.rows.min(self.cols)
    }

    pub fn transposed(&self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Shape of `self * other`, if the inner dimensions agree.
    pub fn product(&self, other: &Shape) -> Option<Shape> {
        (self.cols == other.rows).then_some(Shape {
            rows: self.rows,
            cols: other.cols,
        })
    }

    pub(crate) fn check_len(&self, len: usize) -> Result<()> {
        if len != self.len() {
            return Err(LinealError::InvalidDimensions(format!(
                "Data length ({}) does not match dimensions ({})",
                len, self
            )));
        }
        Ok(())
    }

    /// Row-major offset of `(row, col)`; callers guarantee bounds.
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(self.contains(row, col));
        row * self.cols + col
    }

    pub(crate) fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub(crate) fn from_dims_unchecked(rows: usize, cols: usize) -> Self {
        debug_assert!(rows > 0 && cols > 0);
        Self { rows, cols }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rejects_zero_dimensions() {
        assert!(matches!(
            Shape::new(0, 3),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(matches!(
            Shape::new(3, 0),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(Shape::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_shape_queries() {
        let shape = Shape::new(2, 3).unwrap();
        assert_eq!(shape.dims(), (2, 3));
        assert_eq!(shape.len(), 6);
        assert_eq!(shape.min_dim(), 2);
        assert!(!shape.is_square());
        assert_eq!(shape.transposed(), Shape::new(3, 2).unwrap());
        assert_eq!(shape.to_string(), "2x3");
    }

    #[test]
    fn test_shape_square_from_len() {
        assert_eq!(Shape::square_from_len(9).unwrap(), Shape::square(3).unwrap());
        assert!(Shape::square_from_len(0).is_err());
        assert!(Shape::square_from_len(2).is_err());
        assert!(Shape::square_from_len(3).is_err());
    }

    #[test]
    fn test_shape_of_grid() {
        let grid = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(Shape::of_grid(&grid).unwrap(), Shape::new(2, 3).unwrap());

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        match Shape::of_grid(&ragged) {
            Err(LinealError::InvalidDimensions(msg)) => assert!(msg.contains("Row 1")),
            other => panic!("Expected InvalidDimensions error, got {:?}", other),
        }
        assert!(Shape::of_grid(&[]).is_err());
        assert!(Shape::of_grid(&[vec![]]).is_err());
    }

    #[test]
    fn test_shape_product() {
        let a = Shape::new(2, 3).unwrap();
        let b = Shape::new(3, 4).unwrap();
        assert_eq!(a.product(&b), Some(Shape::new(2, 4).unwrap()));
        assert_eq!(b.product(&a), None);
    }

    #[test]
    fn test_shape_deserialize_validates() {
        let shape: Shape = serde_json::from_str(r#"{"rows":2,"cols":5}"#).unwrap();
        assert_eq!(shape.dims(), (2, 5));
        assert!(serde_json::from_str::<Shape>(r#"{"rows":0,"cols":5}"#).is_err());
    }
}
