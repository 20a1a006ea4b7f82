//! Least squares solver.
//!
//! Every polynomial fit reduces to
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where `x_i` is a row of the Vandermonde design matrix.
//!
//! We solve via SVD rather than the normal equations: Vandermonde matrices get
//! badly conditioned quickly when x-values are large or clustered, and
//! `X^T X` squares that condition number. Nalgebra's `QR::solve` is intended
//! for square systems, so it is not an option for tall design matrices.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.ncols() == 0 {
        return None;
    }

    // Scale every column to unit norm before decomposing; raw polynomial
    // columns differ by orders of magnitude once x leaves [-1, 1].
    let scales: Vec<f64> = x
        .column_iter()
        .map(|c| {
            let norm = c.norm();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    let mut scaled = x.clone();
    for (j, &s) in scales.iter().enumerate() {
        scaled.column_mut(j).unscale_mut(s);
    }

    let svd = scaled.svd(true, true);

    // Singular values below `tol * max_sv` carry no information; treating them
    // as rank deficiency is what lets us report under-determined designs.
    let max_sv = svd.singular_values.max();
    if !(max_sv.is_finite() && max_sv > 0.0) {
        return None;
    }
    let rank = svd
        .singular_values
        .iter()
        .filter(|&&s| s > max_sv * 1e-12)
        .count();
    if rank < x.ncols() {
        return None;
    }

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(mut beta) = svd.solve(y, tol * max_sv) {
            for (j, &s) in scales.iter().enumerate() {
                beta[j] /= s;
            }
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rank_deficient_design_is_rejected() {
        // Both rows identical: a line through one distinct point is not determined.
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[3.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }

    #[test]
    fn mismatched_shapes_return_none() {
        let x = DMatrix::from_row_slice(2, 1, &[1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert!(solve_least_squares(&x, &y).is_none());
    }
}
