//! Gaussian elimination with partial pivoting for the dense representations.
//!
//! Determinant, rank and inverse of general matrices all run through here.
//! A pivot `p` counts as zero when `|p| <= tolerance * max|a_ij|`, i.e. the
//! tolerance is relative to the largest entry of the input.

use log::debug;

use crate::error::{LinealError, Result};
use crate::shape::Shape;

/// Parameters for elimination-based algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elimination {
    /// Relative pivot tolerance.
    pub tolerance: f64,
}

impl Default for Elimination {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
        }
    }
}

impl Elimination {
    pub const DEFAULT_TOLERANCE: f64 = 1e-12;

    /// Creates an instance with the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an instance with the given relative pivot tolerance.
    /// Negative and NaN tolerances are clamped to zero.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
        }
    }

    /// Absolute pivot threshold for `data`; never negative or NaN.
    fn threshold(&self, data: &[f64]) -> f64 {
        let max_abs = data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let threshold = self.tolerance.max(0.0) * max_abs;
        if threshold.is_nan() {
            0.0
        } else {
            threshold
        }
    }

    /// Determinant of the `n x n` row-major matrix `data`.
    ///
    /// Computed as the signed product of the LU pivots; no tolerance is applied
    /// so an exactly singular input yields exactly zero.
    pub(crate) fn determinant(&self, n: usize, data: &[f64]) -> f64 {
        let lu = LuDecomposition::decompose(n, data, self.threshold(data));
        lu.determinant()
    }

    /// True when some pivot of the `n x n` matrix `data` falls below the threshold.
    pub(crate) fn is_singular(&self, n: usize, data: &[f64]) -> bool {
        LuDecomposition::decompose(n, data, self.threshold(data)).singular
    }

    /// Inverse of the `n x n` row-major matrix `data`.
    pub(crate) fn inverse(&self, n: usize, data: &[f64]) -> Result<Vec<f64>> {
        let lu = LuDecomposition::decompose(n, data, self.threshold(data));
        if lu.singular {
            debug!("elimination: {}x{} matrix is singular under tolerance {}", n, n, self.tolerance);
            return Err(LinealError::NotInvertible(format!(
                "pivot below tolerance {} (relative)",
                self.tolerance
            )));
        }
        Ok(lu.inverse())
    }

    /// Rank of the row-major matrix `data` with the given shape.
    pub(crate) fn rank(&self, shape: Shape, data: &[f64]) -> usize {
        let (rows, cols) = shape.dims();
        let threshold = self.threshold(data);
        let mut a = data.to_vec();
        let mut rank = 0;

        for c in 0..cols {
            if rank == rows {
                break;
            }
            let (p, max) = pivot_row(&a, cols, c, rank..rows);
            if max <= threshold {
                continue;
            }
            swap_rows(&mut a, cols, p, rank);
            let pivot = a[rank * cols + c];
            for r in rank + 1..rows {
                let factor = a[r * cols + c] / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in c..cols {
                    a[r * cols + j] -= factor * a[rank * cols + j];
                }
            }
            rank += 1;
        }

        debug!("elimination: rank of {} matrix is {}", shape, rank);
        rank
    }
}

/// Row in `range` with the largest magnitude in column `col`, and that magnitude.
fn pivot_row(a: &[f64], cols: usize, col: usize, range: std::ops::Range<usize>) -> (usize, f64) {
    let start = range.start;
    range
        .map(|r| (r, a[r * cols + col].abs()))
        .fold((start, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best })
}

fn swap_rows(a: &mut [f64], cols: usize, i: usize, j: usize) {
    if i == j {
        return;
    }
    for c in 0..cols {
        a.swap(i * cols + c, j * cols + c);
    }
}

/// `PA = LU` with unit-diagonal `L` and `U` packed into one buffer.
#[derive(Debug, Clone)]
struct LuDecomposition {
    n: usize,
    lu: Vec<f64>,
    /// Row `i` of `PA` is row `perm[i]` of `A`.
    perm: Vec<usize>,
    swaps: usize,
    singular: bool,
}

impl LuDecomposition {
    fn decompose(n: usize, data: &[f64], threshold: f64) -> Self {
        let mut lu = data.to_vec();
        let mut perm: Vec<usize> = (0..n).collect();
        let mut swaps = 0;
        let mut singular = false;

        for k in 0..n {
            let (p, max) = pivot_row(&lu, n, k, k..n);
            if max <= threshold {
                singular = true;
            }
            if max == 0.0 {
                // Column already eliminated; U[k][k] is zero.
                continue;
            }
            if p != k {
                swap_rows(&mut lu, n, p, k);
                perm.swap(p, k);
                swaps += 1;
            }
            let pivot = lu[k * n + k];
            for i in k + 1..n {
                let factor = lu[i * n + k] / pivot;
                lu[i * n + k] = factor;
                for j in k + 1..n {
                    lu[i * n + j] -= factor * lu[k * n + j];
                }
            }
        }

        Self {
            n,
            lu,
            perm,
            swaps,
            singular,
        }
    }

    fn determinant(&self) -> f64 {
        let sign = if self.swaps % 2 == 0 { 1.0 } else { -1.0 };
        (0..self.n).fold(sign, |det, i| det * self.lu[i * self.n + i])
    }

    fn inverse(&self) -> Vec<f64> {
        let n = self.n;
        let mut inverse = vec![0.0; n * n];
        let mut x = vec![0.0; n];

        for j in 0..n {
            // Forward substitution: L y = P e_j.
            for i in 0..n {
                let mut sum = if self.perm[i] == j { 1.0 } else { 0.0 };
                for k in 0..i {
                    sum -= self.lu[i * n + k] * x[k];
                }
                x[i] = sum;
            }
            // Back substitution: U x = y.
            for i in (0..n).rev() {
                let mut sum = x[i];
                for k in i + 1..n {
                    sum -= self.lu[i * n + k] * x[k];
                }
                x[i] = sum / self.lu[i * n + i];
            }
            for i in 0..n {
                inverse[i * n + j] = x[i];
            }
        }
        inverse
    }
}
