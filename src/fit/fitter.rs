//! Low-level fitting routine for a single polynomial degree.
//!
//! Given samples `(x_i, y_i)` and a degree `d` we:
//! - center and scale x into `[-1, 1]`
//! - build the Vandermonde design matrix on the scaled x
//! - solve the OLS problem for the coefficients
//! - score the fit with R² = 1 - SS_res / SS_tot

use nalgebra::DVector;
use tracing::debug;

use crate::domain::{FitResult, SampleSet};
use crate::error::AppError;
use crate::math::{solve_least_squares, vandermonde};
use crate::models::Polynomial;

/// Fit a polynomial of exactly `degree` to `samples`.
///
/// # Errors
/// - `InvalidInput` if `degree >= samples.len()` or the design is rank deficient
/// - `DegenerateFit` if every y-value is identical (SS_tot = 0)
pub fn fit_degree(samples: &SampleSet, degree: usize) -> Result<FitResult, AppError> {
    let n = samples.len();
    if degree >= n {
        return Err(AppError::invalid(format!(
            "Degree {degree} needs at least {} points, got {n}.",
            degree.saturating_add(1)
        )));
    }

    if has_no_spread(samples) {
        return Err(AppError::DegenerateFit);
    }
    let ss_tot = total_sum_of_squares(samples);

    let (center, scale) = x_normalization(samples.xs());
    let ts: Vec<f64> = samples.xs().iter().map(|&x| (x - center) / scale).collect();
    let x = vandermonde(&ts, degree);
    let y = DVector::from_column_slice(samples.ys());
    let beta = solve_least_squares(&x, &y).ok_or_else(|| {
        AppError::invalid(format!(
            "Degree {degree} is under-determined for these samples (too few distinct x-values)."
        ))
    })?;

    let polynomial = Polynomial::from_scaled(beta.iter().copied().collect(), center, scale);
    let ss_res = residual_sum_of_squares(samples, &polynomial);
    let r_squared = 1.0 - ss_res / ss_tot;

    debug!(degree, n, ss_res, ss_tot, r_squared, "fitted candidate degree");

    Ok(FitResult {
        degree,
        polynomial,
        r_squared,
        ss_res,
        ss_tot,
        n,
    })
}

/// `(mean x, max |x - mean|)`; the scale is 1 when every x is equal.
fn x_normalization(xs: &[f64]) -> (f64, f64) {
    let center = xs.iter().sum::<f64>() / xs.len() as f64;
    let scale = xs.iter().map(|&x| (x - center).abs()).fold(0.0, f64::max);
    if scale > 0.0 { (center, scale) } else { (center, 1.0) }
}

/// True when every y-value is identical, so SS_tot is zero and R² undefined.
///
/// Compared directly rather than through `SS_tot == 0`, which rounding in the
/// mean can miss (e.g. three copies of `0.1`).
pub fn has_no_spread(samples: &SampleSet) -> bool {
    let ys = samples.ys();
    ys.iter().all(|&y| y == ys[0]) || total_sum_of_squares(samples) == 0.0
}

/// Σ (y_i - ȳ)².
pub fn total_sum_of_squares(samples: &SampleSet) -> f64 {
    let mean = samples.y_mean();
    samples.ys().iter().map(|&y| (y - mean) * (y - mean)).sum()
}

/// Σ (y_i - p(x_i))².
pub fn residual_sum_of_squares(samples: &SampleSet, polynomial: &Polynomial) -> f64 {
    samples
        .points()
        .map(|(x, y)| {
            let r = y - polynomial.evaluate(x);
            r * r
        })
        .sum()
}
