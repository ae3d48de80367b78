use std::fmt;

use crate::matrix::Matrix;
use crate::traits::{sealed::EntryAt, MatrixRepr};

const DEFAULT_DECIMALS: usize = 4;

/// Rounds half away from zero to `decimals` places, keeping the input when scaling overflows.
fn round_to(value: f64, decimals: usize) -> f64 {
    let factor = 10f64.powi(decimals.min(i32::MAX as usize) as i32);
    let rounded = (value * factor).round() / factor;
    let rounded = if rounded.is_finite() { rounded } else { value };
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Renders one `|a b c|` line per row.
///
/// The formatter precision sets the number of decimals; without one, zero
/// and identity matrices print whole numbers and the rest print four places.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = f.precision().unwrap_or(match self {
            Matrix::Zero(_) | Matrix::Identity(_) => 0,
            _ => DEFAULT_DECIMALS,
        });
        let (rows, cols) = self.dims();
        for r in 0..rows {
            f.write_str("|")?;
            for c in 0..cols {
                if c > 0 {
                    f.write_str(" ")?;
                }
                let value = round_to(self.entry_at(r, c), decimals);
                write!(f, "{:.*}", decimals, value)?;
            }
            f.write_str("|\n")?;
        }
        Ok(())
    }
}

impl Matrix {
    pub fn to_string_with_decimals(&self, decimals: usize) -> String {
        format!("{:.*}", decimals, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_defaults() {
        let i = Matrix::identity(2).unwrap();
        assert_eq!(i.to_string(), "|1 0|\n|0 1|\n");
        let z = Matrix::zero(1, 3).unwrap();
        assert_eq!(z.to_string(), "|0 0 0|\n");
        let d = Matrix::diagonal(vec![0.5, 2.0]).unwrap();
        assert_eq!(d.to_string(), "|0.5000 0.0000|\n|0.0000 2.0000|\n");
    }

    #[test]
    fn test_display_precision() {
        let r = Matrix::rectangular(1, 2, vec![1.23456, -2.5]).unwrap();
        assert_eq!(r.to_string_with_decimals(2), "|1.23 -2.50|\n");
        assert_eq!(format!("{:.0}", r), "|1 -3|\n");
        assert_eq!(format!("{:.1}", Matrix::identity(1).unwrap()), "|1.0|\n");
    }

    #[test]
    fn test_display_drops_negative_zero() {
        let r = Matrix::rectangular(1, 2, vec![-0.00001, -0.0]).unwrap();
        assert_eq!(r.to_string_with_decimals(2), "|0.00 0.00|\n");
    }

    #[test]
    fn test_display_non_finite() {
        let r = Matrix::rectangular(1, 3, vec![f64::NAN, f64::INFINITY, 1e308]).unwrap();
        let text = r.to_string_with_decimals(1);
        assert!(text.starts_with("|NaN inf 1000"));
    }
}
