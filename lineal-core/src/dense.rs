use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LinealError, Result};
use crate::shape::Shape;

/// Row-major element buffer backing the general square and rectangular matrices.
///
/// The buffer is shared behind an `Arc`; values are never mutated after
/// construction, so cloning a matrix is cheap.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DenseStorage {
    shape: Shape,
    data: Arc<[f64]>, // Data stored row-major: data[row * cols + col]
}

impl DenseStorage {
    /// Creates storage from raw data, checking the length against `shape`.
    pub(crate) fn new(shape: Shape, data: Vec<f64>) -> Result<Self> {
        shape.check_len(data.len())?;
        Ok(Self {
            shape,
            data: data.into(),
        })
    }

    /// Flattens a validated row-of-rows grid.
    pub(crate) fn from_grid(grid: &[Vec<f64>]) -> Result<Self> {
        let shape = Shape::of_grid(grid)?;
        Self::new(shape, grid.concat())
    }

    pub(crate) fn from_parts(shape: Shape, data: Vec<f64>) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self {
            shape,
            data: data.into(),
        }
    }

    pub(crate) fn shape(&self) -> Shape {
        self.shape
    }

    pub(crate) fn data(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn get(&self, row: usize, col: usize) -> f64 {
        self.data[self.shape.offset(row, col)]
    }

    pub(crate) fn ptr_eq(&self, other: &DenseStorage) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::from_parts(self.shape, self.data.iter().map(|&v| f(v)).collect())
    }

    /// Applies `f` to the main diagonal only, copying every other entry.
    pub(crate) fn map_diagonal(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        let mut data = self.data.to_vec();
        for i in 0..self.shape.min_dim() {
            let at = self.shape.offset(i, i);
            data[at] = f(i, data[at]);
        }
        Self::from_parts(self.shape, data)
    }

    pub(crate) fn transposed(&self) -> Self {
        let (rows, cols) = self.shape.dims();
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..cols {
            data.extend((0..rows).map(|r| self.data[r * cols + c]));
        }
        Self::from_parts(self.shape.transposed(), data)
    }

    /// Multiplies row `i` by `factors[i]`, i.e. `diag(factors) * self`.
    pub(crate) fn scale_rows(&self, factors: &[f64]) -> Self {
        let cols = self.shape.cols();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| v * factors[i / cols])
            .collect();
        Self::from_parts(self.shape, data)
    }

    /// Multiplies column `j` by `factors[j]`, i.e. `self * diag(factors)`.
    pub(crate) fn scale_cols(&self, factors: &[f64]) -> Self {
        let cols = self.shape.cols();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| v * factors[i % cols])
            .collect();
        Self::from_parts(self.shape, data)
    }
}

/// Serialized form of the general representations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseParts {
    rows: usize,
    cols: usize,
    elements: Vec<f64>,
}

impl TryFrom<DenseParts> for DenseStorage {
    type Error = LinealError;

    fn try_from(parts: DenseParts) -> Result<Self> {
        DenseStorage::new(Shape::new(parts.rows, parts.cols)?, parts.elements)
    }
}

impl From<DenseStorage> for DenseParts {
    fn from(storage: DenseStorage) -> Self {
        let (rows, cols) = storage.shape.dims();
        DenseParts {
            rows,
            cols,
            elements: storage.data.to_vec(),
        }
    }
}

/// Dense product of two row-major buffers; `product` is the shape of the result.
pub(crate) fn matmul(left: &[f64], inner: usize, right: &[f64], product: Shape) -> Vec<f64> {
    let (rows, cols) = product.dims();
    let mut out = vec![0.0; rows * cols];
    for i in 0..rows {
        let out_row = &mut out[i * cols..(i + 1) * cols];
        for k in 0..inner {
            let a = left[i * inner + k];
            let right_row = &right[k * cols..(k + 1) * cols];
            for (o, &b) in out_row.iter_mut().zip(right_row) {
                *o += a * b;
            }
        }
    }
    out
}
