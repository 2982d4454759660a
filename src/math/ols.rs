//! Least squares solvers.
//!
//! The reverser regresses observed distortions on distance from the pivot:
//!
//! ```text
//! minimize Σ (d_i - f · x_i)^2
//! ```
//!
//! which is a one-column least squares problem without intercept. It is solved
//! with the general SVD-based routine so that degenerate inputs (all `x_i`
//! zero) are reported instead of producing `NaN`.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() == 0 || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);

    // A zero singular value means the column carries no information.
    if svd.singular_values.iter().all(|s| *s <= f64::EPSILON) {
        return None;
    }

    for &tol in &[1e-14, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Fit `y = slope · x` (no intercept).
///
/// A single observation is solved by exact division; more observations go
/// through `solve_least_squares`.
pub fn slope_through_origin(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }

    if x.len() == 1 {
        if x[0] == 0.0 {
            return None;
        }
        let slope = y[0] / x[0];
        return slope.is_finite().then_some(slope);
    }

    let design = DMatrix::from_column_slice(x.len(), 1, x);
    let target = DVector::from_column_slice(y);
    solve_least_squares(&design, &target).map(|beta| beta[0])
}
