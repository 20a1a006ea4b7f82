//! Degree selection by R².
//!
//! With a fixed degree we simply fit it. With `auto` we fit degrees 1, 2 and 3
//! and keep the one with the strictly greatest R². Because the comparison is
//! strict, a tie keeps the lower degree.
//!
//! Guardrails:
//! 1. Candidate degrees with `degree >= n` are skipped (reported in `skipped`)
//! 2. Zero-variance y-data fails the whole selection with `DegenerateFit`

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{DegreeSpec, FitResult, SampleSet};
use crate::error::AppError;
use crate::fit::fitter::{fit_degree, has_no_spread};

/// Degrees searched by `DegreeSpec::Auto`, in selection order.
pub const AUTO_DEGREES: [usize; 3] = [1, 2, 3];

/// Output of fitting + selection.
#[derive(Debug, Clone)]
pub struct FitSelection {
    pub best: FitResult,
    /// Fits for all attempted degrees, ascending.
    pub fits: Vec<FitResult>,
    /// Any degrees that were skipped and why (for diagnostics).
    pub skipped: Vec<(usize, String)>,
}

/// Fit `samples` at the requested degree, or pick the best of 1..=3.
pub fn fit_and_select(samples: &SampleSet, requested: DegreeSpec) -> Result<FitSelection, AppError> {
    let degree = match requested {
        DegreeSpec::Fixed(d) => d,
        DegreeSpec::Auto => return select_auto(samples),
    };

    let best = fit_degree(samples, degree)?;
    Ok(FitSelection {
        fits: vec![best.clone()],
        best,
        skipped: Vec::new(),
    })
}

fn select_auto(samples: &SampleSet) -> Result<FitSelection, AppError> {
    // Degeneracy does not depend on the degree; fail once up front rather
    // than reporting it as a skip for every candidate.
    if has_no_spread(samples) {
        return Err(AppError::DegenerateFit);
    }

    let n = samples.len();
    let (eligible, too_high): (Vec<usize>, Vec<usize>) =
        AUTO_DEGREES.iter().copied().partition(|&d| d < n);

    let mut skipped: Vec<(usize, String)> = too_high
        .into_iter()
        .map(|d| (d, format!("Underdetermined: n={n} < degree+1={}", d + 1)))
        .collect();

    // `collect` on an indexed parallel iterator preserves input order, so the
    // selection below still walks degrees in ascending order.
    let outcomes: Vec<(usize, Result<FitResult, AppError>)> = eligible
        .par_iter()
        .map(|&d| (d, fit_degree(samples, d)))
        .collect();

    let mut fits = Vec::with_capacity(outcomes.len());
    for (degree, outcome) in outcomes {
        match outcome {
            Ok(fit) => fits.push(fit),
            Err(AppError::InvalidInput(reason)) => skipped.push((degree, reason)),
            Err(e) => return Err(e),
        }
    }
    skipped.sort_by_key(|(d, _)| *d);

    let best = select_by_r_squared(&fits).ok_or_else(|| {
        AppError::invalid(format!(
            "Not enough distinct samples to fit any degree in 1..=3 (n={n})."
        ))
    })?;

    debug!(degree = best.degree, r_squared = best.r_squared, "auto-selected degree");

    Ok(FitSelection {
        best,
        fits,
        skipped,
    })
}

/// First fit with the strictly greatest R².
fn select_by_r_squared(fits: &[FitResult]) -> Option<FitResult> {
    let mut best: Option<&FitResult> = None;
    for f in fits {
        match best {
            Some(b) if f.r_squared > b.r_squared => best = Some(f),
            None => best = Some(f),
            _ => {}
        }
    }
    best.cloned()
}
