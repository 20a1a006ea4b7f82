//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - kept in the process-lifetime fit history
//! - exported to JSON for later plotting or comparisons

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Polynomial;

/// Paired `(x, y)` observations.
///
/// Only constructible through [`SampleSet::new`], which guarantees equal,
/// non-zero lengths and finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleSet {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, AppError> {
        if xs.len() != ys.len() {
            return Err(AppError::invalid(format!(
                "X and Y must have the same number of values (got {} x, {} y).",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Err(AppError::invalid("No samples were provided."));
        }
        if let Some(v) = xs.iter().chain(ys.iter()).find(|v| !v.is_finite()) {
            return Err(AppError::invalid(format!("Non-finite sample value: {v}")));
        }
        Ok(Self { xs, ys })
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// `(min x, max x)`.
    pub fn x_range(&self) -> (f64, f64) {
        min_max(&self.xs)
    }

    pub fn y_range(&self) -> (f64, f64) {
        min_max(&self.ys)
    }

    pub fn y_mean(&self) -> f64 {
        self.ys.iter().sum::<f64>() / self.ys.len() as f64
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Which polynomial degree(s) to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegreeSpec {
    /// Search degrees 1..=3 and keep the best R².
    Auto,
    Fixed(usize),
}

impl FromStr for DegreeSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(DegreeSpec::Auto);
        }
        s.parse::<usize>()
            .map(DegreeSpec::Fixed)
            .map_err(|_| AppError::invalid(format!("Invalid degree '{s}': expected a non-negative integer or 'auto'.")))
    }
}

impl fmt::Display for DegreeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegreeSpec::Auto => write!(f, "auto"),
            DegreeSpec::Fixed(d) => write!(f, "{d}"),
        }
    }
}

/// What a form submission asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Fit the submitted samples and render them.
    Fit,
    /// Render every fit recorded so far on one chart.
    Overlay,
}

impl Action {
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("overlay") || v.eq_ignore_ascii_case("unify") => {
                Action::Overlay
            }
            _ => Action::Fit,
        }
    }
}

/// Fit output for a single degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub degree: usize,
    pub polynomial: Polynomial,
    /// `1 - SS_res / SS_tot`; negative when the fit is worse than the mean.
    pub r_squared: f64,
    pub ss_res: f64,
    pub ss_tot: f64,
    pub n: usize,
}

impl FitResult {
    /// Coefficients, highest power first.
    pub fn coefficients(&self) -> &[f64] {
        self.polynomial.coefficients()
    }
}

/// Display metadata attached to a fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for PlotLabels {
    fn default() -> Self {
        Self {
            title: "Curve fit".to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
        }
    }
}

/// A successful fit as remembered for the overlay view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitHistoryEntry {
    pub labels: PlotLabels,
    pub samples: SampleSet,
    pub fit: FitResult,
    pub recorded_at: DateTime<Utc>,
}

impl FitHistoryEntry {
    pub fn new(labels: PlotLabels, samples: SampleSet, fit: FitResult) -> Self {
        Self {
            labels,
            samples,
            fit,
            recorded_at: Utc::now(),
        }
    }

    /// Legend text used by the overlay chart.
    pub fn legend(&self) -> String {
        format!(
            "{} (degree {}, R²={:.3})",
            self.labels.title, self.fit.degree, self.fit.r_squared
        )
    }
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub labels: PlotLabels,
    pub degree: usize,
    /// Highest power first.
    pub coefficients: Vec<f64>,
    pub r_squared: f64,
    pub n: usize,
    pub recorded_at: DateTime<Utc>,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_rejects_mismatched_lengths() {
        let err = SampleSet::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn sample_set_rejects_empty_and_non_finite() {
        assert!(SampleSet::new(vec![], vec![]).is_err());
        assert!(SampleSet::new(vec![1.0, f64::NAN], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn sample_set_ranges_and_mean() {
        let s = SampleSet::new(vec![3.0, -1.0, 2.0], vec![1.0, 2.0, 6.0]).unwrap();
        assert_eq!(s.x_range(), (-1.0, 3.0));
        assert_eq!(s.y_range(), (1.0, 6.0));
        assert!((s.y_mean() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn degree_spec_parses_auto_and_integers() {
        assert_eq!(" AUTO ".parse::<DegreeSpec>().unwrap(), DegreeSpec::Auto);
        assert_eq!("2".parse::<DegreeSpec>().unwrap(), DegreeSpec::Fixed(2));
        assert!("-1".parse::<DegreeSpec>().is_err());
        assert!("two".parse::<DegreeSpec>().is_err());
    }

    #[test]
    fn action_defaults_to_fit() {
        assert_eq!(Action::from_form(None), Action::Fit);
        assert_eq!(Action::from_form(Some("fit")), Action::Fit);
        assert_eq!(Action::from_form(Some("overlay")), Action::Overlay);
        assert_eq!(Action::from_form(Some("unify")), Action::Overlay);
    }
}
