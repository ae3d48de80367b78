//! # Lineal Core Library
//!
//! Immutable real-valued matrices in five representations (zero, identity,
//! diagonal, general square, general rectangular) with algebra that keeps
//! results in the most specific representation it can.
//!
//! ```
//! use lineal_core::{Matrix, MatrixKind, MatrixRepr};
//!
//! let d = Matrix::diagonal(vec![2.0, 3.0]).unwrap();
//! let i = Matrix::identity(2).unwrap();
//! let sum = d.add(&i).unwrap();
//! assert_eq!(sum.kind(), MatrixKind::Diagonal);
//! assert_eq!(sum.diagonal_entries(), vec![3.0, 4.0]);
//! ```

// Declare modules
mod dense;
pub mod diagonal;
pub mod elimination;
mod equality;
pub mod error;
mod format;
pub mod identity;
pub mod matrix;
mod ops;
pub mod rectangular;
pub mod shape;
pub mod square;
pub mod traits;
pub mod zero;

// Re-export public types
pub use diagonal::DiagonalMatrix;
pub use elimination::Elimination;
pub use error::{Axis, LinealError, Result};
pub use identity::IdentityMatrix;
pub use matrix::{Matrix, MatrixKind};
pub use rectangular::RectangularMatrix;
pub use shape::Shape;
pub use square::SquareMatrix;
pub use traits::{MatrixRepr, SquareRepr};
pub use zero::ZeroMatrix;
