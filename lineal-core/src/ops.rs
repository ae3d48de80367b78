// Operator overloads for borrowed matrices.
// Binary operators can fail on shape or invertibility, so they yield `Result<Matrix>`;
// scaling and negation cannot fail and yield a `Matrix` directly.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::Result;
use crate::matrix::Matrix;

macro_rules! fallible_binary_op {
    ($trait:ident, $method:ident, $inherent:ident) => {
        impl<'a, 'b> $trait<&'b Matrix> for &'a Matrix {
            type Output = Result<Matrix>;

            fn $method(self, rhs: &'b Matrix) -> Self::Output {
                Matrix::$inherent(self, rhs)
            }
        }
    };
}

fallible_binary_op!(Add, add, add);
fallible_binary_op!(Sub, sub, subtract);
fallible_binary_op!(Mul, mul, multiply);
fallible_binary_op!(Div, div, divide);

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, scalar: f64) -> Matrix {
        self.scale(scalar)
    }
}

impl Neg for &Matrix {
    type Output = Matrix;

    fn neg(self) -> Matrix {
        self.additive_inverse()
    }
}
