//! Value equality and hashing across representations.
//!
//! Two matrices are equal when they have the same shape and the same entry
//! at every position, whatever variant holds them. The hash is built from the
//! shape and the nonzero entries in row-major order, so equal values hash
//! equally regardless of how sparse their representation is.

use std::hash::{Hash, Hasher};

use crate::matrix::Matrix;
use crate::traits::MatrixRepr;

impl PartialEq for Matrix {
    fn eq(&self, other: &Matrix) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        match (self, other) {
            (Matrix::Zero(_), Matrix::Zero(_)) | (Matrix::Identity(_), Matrix::Identity(_)) => true,
            (Matrix::Diagonal(a), Matrix::Diagonal(b)) => a == b,
            _ if self.is_structurally_diagonal() && other.is_structurally_diagonal() => {
                self.diagonal_entries() == other.diagonal_entries()
            }
            (Matrix::Square(a), Matrix::Square(b)) => a == b,
            (Matrix::Rectangular(a), Matrix::Rectangular(b)) => a == b,
            _ => self.dense_values() == other.dense_values(),
        }
    }
}

impl Hash for Matrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let shape = self.shape();
        shape.hash(state);

        // Zeros (including -0.0) contribute nothing.
        let mut feed = |offset: usize, value: f64| {
            if value != 0.0 {
                offset.hash(state);
                value.to_bits().hash(state);
            }
        };
        match self {
            Matrix::Zero(_) => {}
            Matrix::Identity(_) => {
                for k in 0..shape.rows() {
                    feed(shape.offset(k, k), 1.0);
                }
            }
            Matrix::Diagonal(d) => {
                for (k, &v) in d.entries().iter().enumerate() {
                    feed(shape.offset(k, k), v);
                }
            }
            Matrix::Square(_) | Matrix::Rectangular(_) => {
                for (offset, &v) in self.dense_values().iter().enumerate() {
                    feed(offset, v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of(m: &Matrix) -> u64 {
        let mut hasher = DefaultHasher::new();
        m.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_identity_equals_dense_identity() {
        let i = Matrix::identity(3).unwrap();
        let dense = Matrix::square(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let diag = Matrix::diagonal(vec![1.0, 1.0, 1.0]).unwrap();
        assert_eq!(i, dense);
        assert_eq!(dense, i);
        assert_eq!(i, diag);
        assert_eq!(hash_of(&i), hash_of(&dense));
        assert_eq!(hash_of(&i), hash_of(&diag));
    }

    #[test]
    fn test_zero_equals_dense_zeros() {
        let z = Matrix::zero(2, 3).unwrap();
        let r = Matrix::rectangular(2, 3, vec![0.0, -0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_eq!(z, r);
        assert_eq!(hash_of(&z), hash_of(&r));
        assert_ne!(z, Matrix::zero(3, 2).unwrap());
        assert_ne!(hash_of(&z), hash_of(&Matrix::zero(3, 2).unwrap()));
    }

    #[test]
    fn test_diagonal_against_square() {
        let d = Matrix::diagonal(vec![2.0, 3.0]).unwrap();
        let s = Matrix::square(vec![2.0, 0.0, 0.0, 3.0]).unwrap();
        let off = Matrix::square(vec![2.0, 1.0, 0.0, 3.0]).unwrap();
        assert_eq!(d, s);
        assert_ne!(d, off);
        assert_ne!(d, Matrix::identity(2).unwrap());
        assert_ne!(Matrix::zero(2, 2).unwrap(), Matrix::identity(2).unwrap());
    }

    #[test]
    fn test_nan_is_never_equal() {
        let m = Matrix::diagonal(vec![f64::NAN, 1.0]).unwrap();
        assert_ne!(m, m.clone());
    }

    #[test]
    fn test_equal_values_collapse_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(hash_of(&Matrix::identity(2).unwrap()));
        set.insert(hash_of(&Matrix::square(vec![1.0, 0.0, 0.0, 1.0]).unwrap()));
        set.insert(hash_of(&Matrix::diagonal(vec![1.0, 1.0]).unwrap()));
        assert_eq!(set.len(), 1);
    }
}
