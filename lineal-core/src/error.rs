use std::fmt;

use thiserror::Error;

use crate::shape::Shape;

pub type Result<T> = core::result::Result<T, LinealError>;

/// Which index of a matrix an accessor was addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinealError {
    #[error("Invalid matrix dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Dimension mismatch in {operation}: {left} and {right}")]
    DimensionMismatch {
        operation: &'static str,
        left: Shape,
        right: Shape,
    },

    #[error("Invalid matrix content: {0}")]
    InvalidContent(String),

    #[error("Matrix is not invertible: {0}")]
    NotInvertible(String),

    #[error("{axis} index {index} out of bounds (0..{bound})")]
    IndexOutOfBounds { axis: Axis, index: usize, bound: usize },

    #[error("{operation} requires a square matrix, got {shape}")]
    NotSquare {
        operation: &'static str,
        shape: Shape,
    },
}

impl LinealError {
    pub(crate) fn mismatch(operation: &'static str, left: Shape, right: Shape) -> Self {
        LinealError::DimensionMismatch {
            operation,
            left,
            right,
        }
    }

    pub(crate) fn not_square(operation: &'static str, shape: Shape) -> Self {
        LinealError::NotSquare { operation, shape }
    }
}
