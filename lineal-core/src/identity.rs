use serde::{Deserialize, Serialize};

use crate::error::{LinealError, Result};
use crate::shape::Shape;
use crate::traits::{sealed::EntryAt, MatrixRepr, SquareRepr};

/// The `n x n` identity matrix. Stores `n` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct IdentityMatrix {
    size: usize,
}

impl IdentityMatrix {
    pub fn new(n: usize) -> Result<Self> {
        Shape::square(n)?;
        Ok(Self { size: n })
    }

    /// Accepts a diagonal that consists of ones only.
    pub fn from_diagonal(diagonal: &[f64]) -> Result<Self> {
        let identity = Self::new(diagonal.len())?;
        if let Some(at) = diagonal.iter().position(|&v| v != 1.0) {
            return Err(LinealError::InvalidContent(format!(
                "Identity diagonal entry {} is {}, expected 1",
                at, diagonal[at]
            )));
        }
        Ok(identity)
    }

    /// Accepts a square grid holding exactly the identity pattern.
    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        let shape = Shape::of_grid(grid)?;
        if !shape.is_square() {
            return Err(LinealError::not_square("identity construction", shape));
        }
        for (r, row) in grid.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let expected = if r == c { 1.0 } else { 0.0 };
                if v != expected {
                    return Err(LinealError::InvalidContent(format!(
                        "Identity entry ({}, {}) is {}, expected {}",
                        r, c, v, expected
                    )));
                }
            }
        }
        Ok(Self { size: shape.rows() })
    }

    pub(crate) fn with_size(n: usize) -> Self {
        debug_assert!(n > 0);
        Self { size: n }
    }
}

impl TryFrom<usize> for IdentityMatrix {
    type Error = LinealError;

    fn try_from(n: usize) -> Result<Self> {
        Self::new(n)
    }
}

impl From<IdentityMatrix> for usize {
    fn from(identity: IdentityMatrix) -> Self {
        identity.size
    }
}

impl EntryAt for IdentityMatrix {
    fn entry_at(&self, row: usize, col: usize) -> f64 {
        if row == col {
            1.0
        } else {
            0.0
        }
    }
}

impl MatrixRepr for IdentityMatrix {
    fn shape(&self) -> Shape {
        Shape::from_dims_unchecked(self.size, self.size)
    }

    fn diagonal_entries(&self) -> Vec<f64> {
        vec![1.0; self.size]
    }

    fn is_diagonal(&self) -> bool {
        true
    }

    fn rank(&self) -> usize {
        self.size
    }
}

impl SquareRepr for IdentityMatrix {
    fn size(&self) -> usize {
        self.size
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
        1.0
    }
}
