use lineal_core::{Elimination, Matrix, MatrixRepr};
use std::time::Instant;

/// Creates a dense n x n pentadiagonal matrix.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> Matrix {
    let mut elements = vec![0.0; n * n];
    for i in 0..n {
        elements[i * n + i] = 4.0;
        if i >= 1 {
            elements[i * n + i - 1] = -1.0;
            elements[(i - 1) * n + i] = -1.0;
        }
        if i >= 2 {
            elements[i * n + i - 2] = -0.5;
            elements[(i - 2) * n + i] = -0.5;
        }
    }
    Matrix::square(elements).expect("Failed to create square matrix")
}

/// Creates a random diagonal matrix with entries in [1, 2).
fn create_random_diagonal(n: usize) -> Matrix {
    let mut rng = fastrand::Rng::with_seed(7);
    Matrix::diagonal((0..n).map(|_| 1.0 + rng.f64()).collect())
        .expect("Failed to create diagonal matrix")
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 200;
    log::info!("Setting up {}x{} pentadiagonal matrix A...", n, n);
    let a = create_pentadiagonal_matrix(n);
    let d = create_random_diagonal(n);

    log::info!("  Kind: {}", a.kind());
    log::info!("  Symmetric: {:?}", a.is_symmetric());
    log::info!("  Rank: {}", a.rank());

    let elimination = Elimination::default();
    log::info!("Inverting with tolerance {}...", elimination.tolerance);

    let start_time = Instant::now();
    let inverse = a.multiplicative_inverse_with(&elimination);
    let duration = start_time.elapsed();

    match inverse {
        Ok(inverse) => {
            let residual = a
                .multiply(&inverse)
                .and_then(|p| p.subtract(&Matrix::identity(n)?))
                .map(|r| r.to_dense().iter().fold(0.0_f64, |m, v| m.max(v.abs())));
            log::info!("\nInverse computed!");
            log::info!("  Max |A * A^-1 - I|: {:?}", residual);
            log::info!("  Time elapsed: {:?}", duration);
        }
        Err(e) => {
            log::error!("\nInversion failed: {:?}", e);
        }
    }

    // Diagonal scaling keeps the square kind, the product of diagonals keeps the diagonal kind.
    match (d.multiply(&a), d.multiply(&d)) {
        (Ok(scaled), Ok(squared)) => {
            log::info!("D * A is {}, D * D is {}", scaled.kind(), squared.kind());
        }
        (Err(e), _) | (_, Err(e)) => log::error!("Multiplication failed: {:?}", e),
    }

    let small = Matrix::from_rows(&[vec![2.0, 1.0], vec![1.0, 3.0]]).expect("valid grid");
    log::info!("B =\n{:.2}", small);
    match small.power(-1) {
        Ok(inv) => log::info!("B^-1 =\n{}", inv),
        Err(e) => log::error!("B is not invertible: {}", e),
    }
}
