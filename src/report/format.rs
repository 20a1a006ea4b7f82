//! Residuals and formatted fit summaries.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - the CLI and the web page describe a fit the same way

use crate::domain::{FitResult, PlotLabels, SampleSet};
use crate::fit::selection::FitSelection;

/// A per-sample fitted result.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResidual {
    pub x: f64,
    pub y: f64,
    pub y_fit: f64,
    pub residual: f64,
}

/// Compute fitted values and residuals for each sample.
pub fn compute_residuals(samples: &SampleSet, fit: &FitResult) -> Vec<SampleResidual> {
    samples
        .points()
        .map(|(x, y)| {
            let y_fit = fit.polynomial.evaluate(x);
            SampleResidual {
                x,
                y,
                y_fit,
                residual: y - y_fit,
            }
        })
        .collect()
}

/// One-line description of a fit, e.g. `degree 2, R²=0.9981`.
pub fn fit_headline(fit: &FitResult) -> String {
    format!("degree {}, R²={:.4}", fit.degree, fit.r_squared)
}

/// Candidate lines: every attempted degree (chosen one starred) plus skips.
pub fn format_candidates(selection: &FitSelection) -> Vec<String> {
    let mut lines = Vec::new();
    for fit in &selection.fits {
        let chosen = if fit.degree == selection.best.degree { "*" } else { " " };
        lines.push(format!(
            "{chosen} degree {} R²={:.6} SS_res={:.6}",
            fit.degree, fit.r_squared, fit.ss_res
        ));
    }
    for (degree, reason) in &selection.skipped {
        lines.push(format!("  (skipped degree {degree}) {reason}"));
    }
    lines
}

/// Format the full run summary (dataset stats + candidates + chosen polynomial).
pub fn format_run_summary(samples: &SampleSet, selection: &FitSelection, labels: &PlotLabels) -> String {
    let mut out = String::new();
    let (x_lo, x_hi) = samples.x_range();
    let (y_lo, y_hi) = samples.y_range();

    out.push_str(&format!("=== poly - {} ===\n", labels.title));
    out.push_str(&format!(
        "Samples: n={} | {}=[{:.4}, {:.4}] | {}=[{:.4}, {:.4}]\n",
        samples.len(),
        labels.x_label,
        x_lo,
        x_hi,
        labels.y_label,
        y_lo,
        y_hi
    ));

    out.push_str("\nCandidates:\n");
    for line in format_candidates(selection) {
        out.push_str(&line);
        out.push('\n');
    }

    out.push_str("\nChosen fit:\n");
    out.push_str(&format!("- {}\n", fit_headline(&selection.best)));
    out.push_str(&format!("- y = {}\n", selection.best.polynomial));
    out.push_str(&format!("- coefficients: {}\n", fmt_vec(selection.best.coefficients())));
    out.push('\n');

    out.push_str(&format_residual_table(&compute_residuals(samples, &selection.best)));
    out
}

fn format_residual_table(rows: &[SampleResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>12} {:>12} {:>12} {:>12}\n", "x", "y", "y_fit", "residual"));
    out.push_str(&format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "{:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
            r.x, r.y, r.y_fit, r.residual
        ));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}
