use serde::{Deserialize, Serialize};

use crate::dense::{matmul, DenseParts, DenseStorage};
use crate::elimination::Elimination;
use crate::error::{LinealError, Result};
use crate::shape::Shape;
use crate::traits::{sealed::EntryAt, MatrixRepr, SquareRepr};

/// A general `n x n` matrix stored densely in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DenseParts", into = "DenseParts")]
pub struct SquareMatrix {
    storage: DenseStorage,
}

impl SquareMatrix {
    /// Creates a square matrix from row-major data whose length is a perfect square.
    pub fn new(elements: Vec<f64>) -> Result<Self> {
        let shape = Shape::square_from_len(elements.len())?;
        Ok(Self {
            storage: DenseStorage::new(shape, elements)?,
        })
    }

    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        Self::from_storage(DenseStorage::from_grid(grid)?)
    }

    fn from_storage(storage: DenseStorage) -> Result<Self> {
        if !storage.shape().is_square() {
            return Err(LinealError::not_square("square construction", storage.shape()));
        }
        Ok(Self { storage })
    }

    pub(crate) fn wrap(storage: DenseStorage) -> Self {
        debug_assert!(storage.shape().is_square());
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

    pub(crate) fn map_diagonal(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        Self {
            storage: self.storage.map_diagonal(f),
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

    /// `self^p` for `p >= 1` by `p - 1` successive multiplications.
    pub(crate) fn power(&self, p: u32) -> Self {
        if p <= 1 {
            return self.clone();
        }
        let shape = self.storage.shape();
        let n = shape.rows();
        let base = self.storage.data();
        let mut acc = base.to_vec();
        for _ in 1..p {
            acc = matmul(&acc, n, base, shape);
        }
        Self {
            storage: DenseStorage::from_parts(shape, acc),
        }
    }

    pub fn inverse_with(&self, elimination: &Elimination) -> Result<Self> {
        let shape = self.storage.shape();
        let inverse = elimination.inverse(shape.rows(), self.storage.data())?;
        Ok(Self {
            storage: DenseStorage::from_parts(shape, inverse),
        })
    }

    pub(crate) fn is_singular_with(&self, elimination: &Elimination) -> bool {
        elimination.is_singular(self.storage.shape().rows(), self.storage.data())
    }

    pub fn rank_with(&self, elimination: &Elimination) -> usize {
        elimination.rank(self.storage.shape(), self.storage.data())
    }
}

impl TryFrom<DenseParts> for SquareMatrix {
    type Error = LinealError;

    fn try_from(parts: DenseParts) -> Result<Self> {
        Self::from_storage(DenseStorage::try_from(parts)?)
    }
}

impl From<SquareMatrix> for DenseParts {
    fn from(square: SquareMatrix) -> Self {
        square.storage.into()
    }
}

impl EntryAt for SquareMatrix {
    fn entry_at(&self, row: usize, col: usize) -> f64 {
        self.storage.get(row, col)
    }
}

impl MatrixRepr for SquareMatrix {
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

impl SquareRepr for SquareMatrix {
    fn determinant(&self) -> f64 {
        Elimination::default().determinant(self.size(), self.storage.data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<Vec<f64>> {
        vec![
            vec![10.0, 12.0, 9.0, 8.0],
            vec![4.0, 1.0, 0.0, 0.0],
            vec![5.0, 6.0, 1.0, 15.0],
            vec![30.0, 22.0, 0.0, 13.0],
        ]
    }

    #[test]
    fn test_square_matrix_construction() {
        assert!(matches!(
            SquareMatrix::new(vec![]),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(matches!(
            SquareMatrix::new(vec![1.0, 2.0, 3.0]),
            Err(LinealError::InvalidDimensions(_))
        ));
        assert!(matches!(
            SquareMatrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0]]),
            Err(LinealError::NotSquare { .. })
        ));
        assert!(matches!(
            SquareMatrix::from_rows(&[vec![]]),
            Err(LinealError::InvalidDimensions(_))
        ));
        let m = SquareMatrix::from_rows(&[vec![1.0, 2.0], vec![1.0, 2.0]]).unwrap();
        assert_eq!(m.dims(), (2, 2));
    }

    #[test]
    fn test_square_matrix_access() {
        let m = SquareMatrix::from_rows(&grid()).unwrap();
        assert_eq!(m.row(1).unwrap(), vec![4.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.column(1).unwrap(), vec![12.0, 1.0, 6.0, 22.0]);
        assert!(m.row(4).is_err());
        assert!(m.column(4).is_err());
        assert_eq!(m.diagonal_entries(), vec![10.0, 1.0, 1.0, 13.0]);
        assert_eq!(m.as_bytes().len(), 16 * std::mem::size_of::<f64>());
    }

    #[test]
    fn test_square_matrix_is_diagonal() {
        let m1 = SquareMatrix::from_rows(&[
            vec![11.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 36.0],
        ])
        .unwrap();
        let m2 = SquareMatrix::from_rows(&[
            vec![11.0, 0.0, 10.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 36.0],
        ])
        .unwrap();
        assert!(m1.is_diagonal());
        assert!(!m2.is_diagonal());
    }

    #[test]
    fn test_square_matrix_triangular() {
        let lower = SquareMatrix::from_rows(&[
            vec![1.0, 0.0, 0.0],
            vec![4.0, 5.0, 0.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();
        let not_lower = SquareMatrix::from_rows(&[
            vec![1.0, 0.0, 1.0],
            vec![4.0, 5.0, 1.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();
        assert!(lower.is_lower_triangular());
        assert!(!lower.is_upper_triangular());
        assert!(!not_lower.is_lower_triangular());
        assert!(lower.transposed().is_upper_triangular());
    }

    #[test]
    fn test_square_matrix_symmetric() {
        let sym = SquareMatrix::from_rows(&[
            vec![1.0, 7.0, 3.0],
            vec![7.0, 4.0, 5.0],
            vec![3.0, 5.0, 6.0],
        ])
        .unwrap();
        assert!(sym.is_symmetric());
        assert!(!SquareMatrix::from_rows(&grid()).unwrap().is_symmetric());
    }

    #[test]
    fn test_square_matrix_power() {
        let m = SquareMatrix::new(vec![1.0, 1.0, 0.0, 1.0]).unwrap();
        assert_eq!(m.power(1), m);
        assert_eq!(m.power(3).elements(), &[1.0, 3.0, 0.0, 1.0]);
    }

    #[test]
    fn test_square_matrix_determinant_and_rank() {
        let m = SquareMatrix::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((m.determinant() + 2.0).abs() < 1e-12);
        assert_eq!(m.rank(), 2);

        let singular = SquareMatrix::new(vec![1.0, 2.0, 2.0, 4.0]).unwrap();
        assert_eq!(singular.determinant(), 0.0);
        assert_eq!(singular.rank(), 1);
        assert!(matches!(
            singular.inverse_with(&Elimination::default()),
            Err(LinealError::NotInvertible(_))
        ));
    }

    #[test]
    fn test_square_matrix_serde() {
        let m = SquareMatrix::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"rows":2,"cols":2,"elements":[1.0,2.0,3.0,4.0]}"#);
        assert_eq!(serde_json::from_str::<SquareMatrix>(&json).unwrap(), m);
        let wide = r#"{"rows":1,"cols":2,"elements":[1.0,2.0]}"#;
        assert!(serde_json::from_str::<SquareMatrix>(wide).is_err());
    }
}
