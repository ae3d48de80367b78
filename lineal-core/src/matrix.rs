//! The closed set of matrix representations and the algebra between them.
//!
//! Every binary operation matches on the variants of both operands to pick
//! the cheapest valid algorithm, and returns the most specific variant that
//! can hold the result. Dense materialization is the last resort.

use std::borrow::Cow;
use std::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::dense::{matmul, DenseStorage};
use crate::diagonal::DiagonalMatrix;
use crate::elimination::Elimination;
use crate::error::{LinealError, Result};
use crate::identity::IdentityMatrix;
use crate::rectangular::RectangularMatrix;
use crate::shape::Shape;
use crate::square::SquareMatrix;
use crate::traits::{sealed::EntryAt, MatrixRepr, SquareRepr};
use crate::zero::ZeroMatrix;

/// An immutable matrix value in one of five representations.
///
/// Equality and hashing depend on the mathematical content only, so
/// `Matrix::identity(2)` equals the dense square `[[1, 0], [0, 1]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matrix {
    Zero(ZeroMatrix),
    Identity(IdentityMatrix),
    Diagonal(DiagonalMatrix),
    Square(SquareMatrix),
    Rectangular(RectangularMatrix),
}

/// Names the representation a [`Matrix`] currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Zero,
    Identity,
    Diagonal,
    Square,
    Rectangular,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixKind::Zero => "zero",
            MatrixKind::Identity => "identity",
            MatrixKind::Diagonal => "diagonal",
            MatrixKind::Square => "square",
            MatrixKind::Rectangular => "rectangular",
        };
        f.write_str(name)
    }
}

/// Evaluates `$body` with `$m` bound to the inner representation.
macro_rules! each_variant {
    ($matrix:expr, $m:ident => $body:expr) => {
        match $matrix {
            Matrix::Zero($m) => $body,
            Matrix::Identity($m) => $body,
            Matrix::Diagonal($m) => $body,
            Matrix::Square($m) => $body,
            Matrix::Rectangular($m) => $body,
        }
    };
}

// --- Construction ---

impl Matrix {
    pub fn zero(rows: usize, cols: usize) -> Result<Self> {
        Ok(Matrix::Zero(ZeroMatrix::new(rows, cols)?))
    }

    pub fn identity(n: usize) -> Result<Self> {
        Ok(Matrix::Identity(IdentityMatrix::new(n)?))
    }

    pub fn diagonal(entries: Vec<f64>) -> Result<Self> {
        Ok(Matrix::Diagonal(DiagonalMatrix::new(entries)?))
    }

    /// A general square matrix from row-major data of perfect-square length.
    pub fn square(elements: Vec<f64>) -> Result<Self> {
        Ok(Matrix::Square(SquareMatrix::new(elements)?))
    }

    /// A general rectangular matrix; fails for `rows == cols`.
    pub fn rectangular(rows: usize, cols: usize, elements: Vec<f64>) -> Result<Self> {
        Ok(Matrix::Rectangular(RectangularMatrix::new(rows, cols, elements)?))
    }

    /// A general matrix of any shape, square or rectangular as the shape dictates.
    pub fn dense(rows: usize, cols: usize, elements: Vec<f64>) -> Result<Self> {
        let shape = Shape::new(rows, cols)?;
        Ok(Self::general(DenseStorage::new(shape, elements)?))
    }

    /// A general matrix from a grid of rows.
    pub fn from_rows(grid: &[Vec<f64>]) -> Result<Self> {
        Ok(Self::general(DenseStorage::from_grid(grid)?))
    }

    fn general(storage: DenseStorage) -> Self {
        if storage.shape().is_square() {
            Matrix::Square(SquareMatrix::wrap(storage))
        } else {
            Matrix::Rectangular(RectangularMatrix::wrap(storage))
        }
    }

    fn zero_of(shape: Shape) -> Self {
        Matrix::Zero(ZeroMatrix::with_shape(shape))
    }
}

impl From<ZeroMatrix> for Matrix {
    fn from(m: ZeroMatrix) -> Self {
        Matrix::Zero(m)
    }
}

impl From<IdentityMatrix> for Matrix {
    fn from(m: IdentityMatrix) -> Self {
        Matrix::Identity(m)
    }
}

impl From<DiagonalMatrix> for Matrix {
    fn from(m: DiagonalMatrix) -> Self {
        Matrix::Diagonal(m)
    }
}

impl From<SquareMatrix> for Matrix {
    fn from(m: SquareMatrix) -> Self {
        Matrix::Square(m)
    }
}

impl From<RectangularMatrix> for Matrix {
    fn from(m: RectangularMatrix) -> Self {
        Matrix::Rectangular(m)
    }
}

// --- Introspection ---

impl EntryAt for Matrix {
    fn entry_at(&self, row: usize, col: usize) -> f64 {
        each_variant!(self, m => m.entry_at(row, col))
    }
}

impl MatrixRepr for Matrix {
    fn shape(&self) -> Shape {
        each_variant!(self, m => m.shape())
    }

    fn to_dense(&self) -> Vec<f64> {
        each_variant!(self, m => m.to_dense())
    }

    fn row(&self, index: usize) -> Result<Vec<f64>> {
        each_variant!(self, m => m.row(index))
    }

    fn column(&self, index: usize) -> Result<Vec<f64>> {
        each_variant!(self, m => m.column(index))
    }

    fn diagonal_entries(&self) -> Vec<f64> {
        each_variant!(self, m => m.diagonal_entries())
    }

    fn is_diagonal(&self) -> bool {
        each_variant!(self, m => m.is_diagonal())
    }

    fn rank(&self) -> usize {
        each_variant!(self, m => m.rank())
    }
}

impl Matrix {
    pub fn kind(&self) -> MatrixKind {
        match self {
            Matrix::Zero(_) => MatrixKind::Zero,
            Matrix::Identity(_) => MatrixKind::Identity,
            Matrix::Diagonal(_) => MatrixKind::Diagonal,
            Matrix::Square(_) => MatrixKind::Square,
            Matrix::Rectangular(_) => MatrixKind::Rectangular,
        }
    }

    /// True for the variants whose off-diagonal entries are zero by construction.
    pub(crate) fn is_structurally_diagonal(&self) -> bool {
        matches!(
            self,
            Matrix::Zero(_) | Matrix::Identity(_) | Matrix::Diagonal(_)
        )
    }

    pub(crate) fn storage(&self) -> Option<&DenseStorage> {
        match self {
            Matrix::Square(m) => Some(m.storage()),
            Matrix::Rectangular(m) => Some(m.storage()),
            _ => None,
        }
    }

    /// The dense expansion, borrowed when the representation already stores it.
    pub(crate) fn dense_values(&self) -> Cow<'_, [f64]> {
        match self.storage() {
            Some(storage) => Cow::Borrowed(storage.data()),
            None => Cow::Owned(self.to_dense()),
        }
    }

    /// True when both values are the same object or share their backing buffer.
    pub fn shares_storage(&self, other: &Matrix) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self, other) {
            (Matrix::Diagonal(a), Matrix::Diagonal(b)) => a.ptr_eq(b),
            (Matrix::Square(a), Matrix::Square(b)) => a.storage().ptr_eq(b.storage()),
            (Matrix::Rectangular(a), Matrix::Rectangular(b)) => {
                a.storage().ptr_eq(b.storage())
            }
            _ => false,
        }
    }

    /// Runs `query` against the square capabilities, rejecting non-square shapes.
    fn square_query<T>(
        &self,
        operation: &'static str,
        zero: T,
        query: impl Fn(&dyn SquareRepr) -> T,
    ) -> Result<T> {
        match self {
            Matrix::Zero(m) if m.is_square() => Ok(zero),
            Matrix::Identity(m) => Ok(query(m)),
            Matrix::Diagonal(m) => Ok(query(m)),
            Matrix::Square(m) => Ok(query(m)),
            Matrix::Zero(_) | Matrix::Rectangular(_) => {
                Err(LinealError::not_square(operation, self.shape()))
            }
        }
    }

    pub fn is_symmetric(&self) -> Result<bool> {
        self.square_query("is_symmetric", true, |m| m.is_symmetric())
    }

    pub fn is_lower_triangular(&self) -> Result<bool> {
        self.square_query("is_lower_triangular", true, |m| m.is_lower_triangular())
    }

    pub fn is_upper_triangular(&self) -> Result<bool> {
        self.square_query("is_upper_triangular", true, |m| m.is_upper_triangular())
    }

    pub fn determinant(&self) -> Result<f64> {
        self.square_query("determinant", 0.0, |m| m.determinant())
    }

    /// `|A|`, the determinant of a square matrix.
    pub fn abs(&self) -> Result<f64> {
        self.determinant()
    }

    pub fn rank_with(&self, elimination: &Elimination) -> usize {
        match self {
            Matrix::Square(m) => m.rank_with(elimination),
            Matrix::Rectangular(m) => m.rank_with(elimination),
            _ => self.rank(),
        }
    }

    /// The most specific representation holding the same value.
    pub fn simplified(&self) -> Matrix {
        let all_zero = |values: &[f64]| values.iter().all(|&v| v == 0.0);
        match self {
            Matrix::Zero(_) | Matrix::Identity(_) => self.clone(),
            Matrix::Diagonal(d) if all_zero(d.entries()) => Self::zero_of(d.shape()),
            Matrix::Diagonal(d) if d.entries().iter().all(|&v| v == 1.0) => {
                Matrix::Identity(IdentityMatrix::with_size(d.size()))
            }
            Matrix::Diagonal(_) => self.clone(),
            Matrix::Square(s) if all_zero(s.elements()) => Self::zero_of(s.shape()),
            Matrix::Square(s) if s.is_diagonal() => {
                Matrix::Diagonal(DiagonalMatrix::from_parts(s.diagonal_entries())).simplified()
            }
            Matrix::Square(_) => self.clone(),
            Matrix::Rectangular(r) if all_zero(r.elements()) => Self::zero_of(r.shape()),
            Matrix::Rectangular(_) => self.clone(),
        }
    }
}

// --- Algebra ---

impl Matrix {
    fn check_same_shape(&self, operation: &'static str, other: &Matrix) -> Result<Shape> {
        let (left, right) = (self.shape(), other.shape());
        if left != right {
            return Err(LinealError::mismatch(operation, left, right));
        }
        Ok(left)
    }

    /// Entrywise combination through the dense expansions of both operands.
    fn dense_zip(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix {
        let shape = self.shape();
        debug!(
            "dense fallback: {} and {} operands of shape {}",
            self.kind(),
            other.kind(),
            shape
        );
        let (left, right) = (self.dense_values(), other.dense_values());
        let data = left.iter().zip(right.iter()).map(|(&a, &b)| f(a, b)).collect();
        Self::general(DenseStorage::from_parts(shape, data))
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape("add", other)?;
        let sum = match (self, other) {
            (_, Matrix::Zero(_)) => {
                trace!("add: right operand is zero");
                self.clone()
            }
            (Matrix::Zero(_), _) => {
                trace!("add: left operand is zero");
                other.clone()
            }
            (Matrix::Identity(i), Matrix::Identity(_)) => {
                Matrix::Diagonal(DiagonalMatrix::filled(i.size(), 2.0))
            }
            (Matrix::Identity(_), Matrix::Diagonal(d))
            | (Matrix::Diagonal(d), Matrix::Identity(_)) => {
                Matrix::Diagonal(d.map(|v| v + 1.0))
            }
            (Matrix::Diagonal(a), Matrix::Diagonal(b)) => {
                Matrix::Diagonal(a.zip_with(b.entries(), |x, y| x + y))
            }
            (Matrix::Identity(_) | Matrix::Diagonal(_), Matrix::Square(s)) => {
                trace!("add: diagonal onto square");
                let d = self.diagonal_entries();
                Matrix::Square(s.map_diagonal(|i, v| d[i] + v))
            }
            (Matrix::Square(s), Matrix::Identity(_) | Matrix::Diagonal(_)) => {
                trace!("add: diagonal onto square");
                let d = other.diagonal_entries();
                Matrix::Square(s.map_diagonal(|i, v| v + d[i]))
            }
            _ => self.dense_zip(other, |a, b| a + b),
        };
        Ok(sum)
    }

    /// `self - other`. A value-equal operand yields the zero matrix.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        let shape = self.check_same_shape("subtract", other)?;
        let difference = match (self, other) {
            (_, Matrix::Zero(_)) => {
                trace!("subtract: right operand is zero");
                self.clone()
            }
            _ if self == other => {
                trace!("subtract: operands are equal");
                Self::zero_of(shape)
            }
            (Matrix::Zero(_), _) => other.additive_inverse(),
            (Matrix::Identity(_), Matrix::Diagonal(d)) => Matrix::Diagonal(d.map(|v| 1.0 - v)),
            (Matrix::Diagonal(d), Matrix::Identity(_)) => Matrix::Diagonal(d.map(|v| v - 1.0)),
            (Matrix::Diagonal(a), Matrix::Diagonal(b)) => {
                Matrix::Diagonal(a.zip_with(b.entries(), |x, y| x - y))
            }
            (Matrix::Identity(_) | Matrix::Diagonal(_), Matrix::Square(s)) => {
                trace!("subtract: square from diagonal");
                let d = self.diagonal_entries();
                Matrix::Square(s.map(|v| -v).map_diagonal(|i, v| d[i] + v))
            }
            (Matrix::Square(s), Matrix::Identity(_) | Matrix::Diagonal(_)) => {
                trace!("subtract: diagonal from square");
                let d = other.diagonal_entries();
                Matrix::Square(s.map_diagonal(|i, v| v - d[i]))
            }
            _ => self.dense_zip(other, |a, b| a - b),
        };
        Ok(difference)
    }

    /// Multiplies every entry by `scalar`, keeping the representation where it still applies.
    pub fn scale(&self, scalar: f64) -> Matrix {
        if scalar == -1.0 {
            return self.additive_inverse();
        }
        if scalar == 0.0 {
            return Self::zero_of(self.shape());
        }
        if scalar == 1.0 {
            return self.clone();
        }
        match self {
            Matrix::Zero(_) => self.clone(),
            Matrix::Identity(i) => Matrix::Diagonal(DiagonalMatrix::filled(i.size(), scalar)),
            Matrix::Diagonal(d) => Matrix::Diagonal(d.map(|v| v * scalar)),
            Matrix::Square(s) => Matrix::Square(s.map(|v| v * scalar)),
            Matrix::Rectangular(r) => Matrix::Rectangular(r.map(|v| v * scalar)),
        }
    }

    /// The matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        let product = self
            .shape()
            .product(&other.shape())
            .ok_or_else(|| LinealError::mismatch("multiply", self.shape(), other.shape()))?;

        let result = match (self, other) {
            (_, Matrix::Zero(_)) | (Matrix::Zero(_), _) => {
                trace!("multiply: zero operand");
                Self::zero_of(product)
            }
            (_, Matrix::Identity(_)) => {
                trace!("multiply: right operand is identity");
                self.clone()
            }
            (Matrix::Identity(_), _) => {
                trace!("multiply: left operand is identity");
                other.clone()
            }
            (Matrix::Diagonal(a), Matrix::Diagonal(b)) => {
                Matrix::Diagonal(a.zip_with(b.entries(), |x, y| x * y))
            }
            (Matrix::Diagonal(d), Matrix::Square(s)) => Matrix::Square(s.scale_rows(d.entries())),
            (Matrix::Diagonal(d), Matrix::Rectangular(r)) => {
                Matrix::Rectangular(r.scale_rows(d.entries()))
            }
            (Matrix::Square(s), Matrix::Diagonal(d)) => Matrix::Square(s.scale_cols(d.entries())),
            (Matrix::Rectangular(r), Matrix::Diagonal(d)) => {
                Matrix::Rectangular(r.scale_cols(d.entries()))
            }
            _ => {
                debug!(
                    "dense product: {} x {} -> {}",
                    self.shape(),
                    other.shape(),
                    product
                );
                let (left, right) = (self.dense_values(), other.dense_values());
                let data = matmul(&left, self.cols(), &right, product);
                Self::general(DenseStorage::from_parts(product, data))
            }
        };
        Ok(result)
    }

    /// `self * other^-1`.
    pub fn divide(&self, other: &Matrix) -> Result<Matrix> {
        self.divide_with(other, &Elimination::default())
    }

    pub fn divide_with(&self, other: &Matrix, elimination: &Elimination) -> Result<Matrix> {
        if self.cols() != other.rows() {
            return Err(LinealError::mismatch("divide", self.shape(), other.shape()));
        }
        match other {
            Matrix::Zero(_) => {
                return Err(LinealError::NotInvertible(
                    "zero matrix has no inverse".to_string(),
                ))
            }
            Matrix::Identity(_) => return Ok(self.clone()),
            // Singular divisors fall through to the inverse, which reports them.
            Matrix::Diagonal(d) if d.has_zero_entry() => {}
            Matrix::Square(s) if self.shares_storage(other) && s.is_singular_with(elimination) => {}
            _ if self.shares_storage(other) => {
                trace!("divide: operand divided by itself");
                return Ok(Matrix::Identity(IdentityMatrix::with_size(self.rows())));
            }
            _ => {}
        }
        self.multiply(&other.multiplicative_inverse_with(elimination)?)
    }

    /// `self^p` for a square matrix. Negative powers invert first.
    pub fn power(&self, p: i32) -> Result<Matrix> {
        self.power_with(p, &Elimination::default())
    }

    pub fn power_with(&self, p: i32, elimination: &Elimination) -> Result<Matrix> {
        let shape = self.shape();
        if !shape.is_square() {
            return Err(LinealError::not_square("power", shape));
        }
        match p {
            0 => Ok(Matrix::Identity(IdentityMatrix::with_size(shape.rows()))),
            1 => Ok(self.clone()),
            -1 => self.multiplicative_inverse_with(elimination),
            p if p < 0 => self
                .multiplicative_inverse_with(elimination)?
                .positive_power(p.unsigned_abs()),
            p => self.positive_power(p.unsigned_abs()),
        }
    }

    fn positive_power(&self, p: u32) -> Result<Matrix> {
        match self {
            Matrix::Zero(_) | Matrix::Identity(_) => Ok(self.clone()),
            Matrix::Diagonal(d) => Ok(Matrix::Diagonal(d.map(|v| v.powf(f64::from(p))))),
            Matrix::Square(s) => Ok(Matrix::Square(s.power(p))),
            Matrix::Rectangular(r) => Err(LinealError::not_square("power", r.shape())),
        }
    }

    /// `-self`.
    pub fn additive_inverse(&self) -> Matrix {
        match self {
            Matrix::Zero(_) => self.clone(),
            Matrix::Identity(i) => Matrix::Diagonal(DiagonalMatrix::filled(i.size(), -1.0)),
            Matrix::Diagonal(d) => Matrix::Diagonal(d.map(|v| -v)),
            Matrix::Square(s) => Matrix::Square(s.map(|v| -v)),
            Matrix::Rectangular(r) => Matrix::Rectangular(r.map(|v| -v)),
        }
    }

    /// `self^-1`.
    pub fn multiplicative_inverse(&self) -> Result<Matrix> {
        self.multiplicative_inverse_with(&Elimination::default())
    }

    pub fn multiplicative_inverse_with(&self, elimination: &Elimination) -> Result<Matrix> {
        match self {
            Matrix::Zero(_) => Err(LinealError::NotInvertible(
                "zero matrix has no inverse".to_string(),
            )),
            Matrix::Identity(_) => Ok(self.clone()),
            Matrix::Diagonal(d) => Ok(Matrix::Diagonal(d.reciprocal()?)),
            Matrix::Square(s) => Ok(Matrix::Square(s.inverse_with(elimination)?)),
            Matrix::Rectangular(r) => Err(LinealError::NotInvertible(format!(
                "{} matrix is not square",
                r.shape()
            ))),
        }
    }

    pub fn transposed(&self) -> Matrix {
        match self {
            Matrix::Zero(z) => Matrix::Zero(z.transposed()),
            Matrix::Identity(_) | Matrix::Diagonal(_) => self.clone(),
            Matrix::Square(s) => Matrix::Square(s.transposed()),
            Matrix::Rectangular(r) => Matrix::Rectangular(r.transposed()),
        }
    }
}
