//! Export per-sample fitted values to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{FitResult, SampleSet};
use crate::error::AppError;

/// Write `x,y,y_fit,residual` rows for every sample.
pub fn write_residuals_csv(path: &Path, samples: &SampleSet, fit: &FitResult) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "x,y,y_fit,residual")
        .map_err(|e| AppError::Io(format!("Failed to write export CSV header: {e}")))?;

    for (x, y) in samples.points() {
        let y_fit = fit.polynomial.evaluate(x);
        writeln!(file, "{x},{y},{y_fit:.10},{:.10}", y - y_fit)
            .map_err(|e| AppError::Io(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit_degree;

    #[test]
    fn one_row_per_sample_plus_header() {
        let samples = SampleSet::new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 7.0]).unwrap();
        let fit = fit_degree(&samples, 1).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fit.csv");
        write_residuals_csv(&path, &samples, &fit).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "x,y,y_fit,residual");
        assert!(lines[1].starts_with("1,2,"));
    }
}
