use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LinealError, Result};
use crate::shape::Shape;
use crate::traits::{sealed::EntryAt, MatrixRepr, SquareRepr};

/// A square matrix that is zero off the main diagonal. Stores the `n` diagonal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct DiagonalMatrix {
    entries: Arc<[f64]>,
}

impl DiagonalMatrix {
    pub fn new(entries: Vec<f64>) -> Result<Self> {
        Shape::square(entries.len())?;
        Ok(Self::from_parts(entries))
    }

    /// Extracts the diagonal of a square grid whose off-diagonal entries are all zero.
    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        let shape = Shape::of_grid(grid)?;
        if !shape.is_square() {
            return Err(LinealError::not_square("diagonal construction", shape));
        }
        for (r, row) in grid.iter().enumerate() {
            if let Some(c) = (0..row.len()).find(|&c| c != r && row[c] != 0.0) {
                return Err(LinealError::InvalidContent(format!(
                    "Diagonal matrix has nonzero off-diagonal entry at ({}, {})",
                    r, c
                )));
            }
        }
        Ok(Self::from_parts(
            grid.iter().enumerate().map(|(i, row)| row[i]).collect(),
        ))
    }

    pub(crate) fn from_parts(entries: Vec<f64>) -> Self {
        debug_assert!(!entries.is_empty());
        Self {
            entries: entries.into(),
        }
    }

    pub(crate) fn filled(n: usize, value: f64) -> Self {
        Self::from_parts(vec![value; n])
    }

    /// The stored diagonal.
    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    pub fn has_zero_entry(&self) -> bool {
        self.entries.iter().any(|&v| v == 0.0)
    }

    pub(crate) fn ptr_eq(&self, other: &DiagonalMatrix) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_parts(self.entries.iter().map(|&v| f(v)).collect())
    }

    pub(crate) fn zip_with(&self, other: &[f64], f: impl Fn(f64, f64) -> f64) -> Self {
        debug_assert_eq!(self.entries.len(), other.len());
        Self::from_parts(
            self.entries
                .iter()
                .zip(other)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        )
    }

    /// Entrywise reciprocal; fails when any diagonal entry is zero.
    pub fn reciprocal(&self) -> Result<Self> {
        if let Some(at) = self.entries.iter().position(|&v| v == 0.0) {
            return Err(LinealError::NotInvertible(format!(
                "diagonal entry {} is zero",
                at
            )));
        }
        Ok(self.map(|v| 1.0 / v))
    }
}

impl TryFrom<Vec<f64>> for DiagonalMatrix {
    type Error = LinealError;

    fn try_from(entries: Vec<f64>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<DiagonalMatrix> for Vec<f64> {
    fn from(diagonal: DiagonalMatrix) -> Self {
        diagonal.entries.to_vec()
    }
}

impl EntryAt for DiagonalMatrix {
    fn entry_at(&self, row: usize, col: usize) -> f64 {
        if row == col {
            self.entries[row]
        } else {
            0.0
        }
    }
}

impl MatrixRepr for DiagonalMatrix {
    fn shape(&self) -> Shape {
        let n = self.entries.len();
        Shape::from_dims_unchecked(n, n)
    }

    fn diagonal_entries(&self) -> Vec<f64> {
        self.entries.to_vec()
    }

    fn is_diagonal(&self) -> bool {
        true
    }

    /// Number of nonzero diagonal entries.
    fn rank(&self) -> usize {
        self.entries.iter().filter(|&&v| v != 0.0).count()
    }
}

impl SquareRepr for DiagonalMatrix {
    fn size(&self) -> usize {
        self.entries.len()
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn is_lower_triangular(&self) -> bool {
        true
    }

    fn is_upper_triangular(&self) -> bool {
        true
    }

    fn determinant(&self) -> f64 {
        self.entries.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_new() {
        let d = DiagonalMatrix::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(d.dims(), (3, 3));
        assert_eq!(d.entries(), &[1.0, 2.0, 3.0]);
        assert_eq!(d.determinant(), 6.0);
        assert_eq!(d.rank(), 3);
        assert_eq!(d.row(1).unwrap(), vec![0.0, 2.0, 0.0]);
        assert_eq!(d.column(2).unwrap(), vec![0.0, 0.0, 3.0]);
        assert!(matches!(
            DiagonalMatrix::new(vec![]),
            Err(LinealError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_diagonal_from_rows() {
        let grid = vec![
            vec![4.0, 0.0, 0.0],
            vec![0.0, -0.0, 0.0],
            vec![0.0, 0.0, 9.0],
        ];
        let d = DiagonalMatrix::from_rows(&grid).unwrap();
        assert_eq!(d.entries(), &[4.0, 0.0, 9.0]);

        let off = vec![vec![1.0, 0.0], vec![3.0, 1.0]];
        match DiagonalMatrix::from_rows(&off) {
            Err(LinealError::InvalidContent(msg)) => assert!(msg.contains("(1, 0)")),
            other => panic!("Expected InvalidContent error, got {:?}", other),
        }

        let wide = vec![vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            DiagonalMatrix::from_rows(&wide),
            Err(LinealError::NotSquare { .. })
        ));
    }

    #[test]
    fn test_diagonal_zero_entry_policy() {
        let d = DiagonalMatrix::new(vec![2.0, 0.0, 5.0]).unwrap();
        assert!(d.has_zero_entry());
        assert_eq!(d.rank(), 2);
        assert_eq!(d.determinant(), 0.0);
        assert!(matches!(d.reciprocal(), Err(LinealError::NotInvertible(_))));

        let d = DiagonalMatrix::new(vec![2.0, 4.0]).unwrap();
        assert_eq!(d.reciprocal().unwrap().entries(), &[0.5, 0.25]);
    }

    #[test]
    fn test_diagonal_serde() {
        let d = DiagonalMatrix::new(vec![1.5, 2.0]).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "[1.5,2.0]");
        assert_eq!(serde_json::from_str::<DiagonalMatrix>(&json).unwrap(), d);
        assert!(serde_json::from_str::<DiagonalMatrix>("[]").is_err());
    }
}
