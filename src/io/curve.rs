//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - degree + coefficients (highest power first) + R²
//! - display labels
//! - a precomputed fitted grid over the sample x-range for quick plotting
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{CurveFile, CurveGrid, FitHistoryEntry};
use crate::error::AppError;
use crate::plot::linspace;

const GRID_POINTS: usize = 101;

pub fn curve_file(entry: &FitHistoryEntry) -> CurveFile {
    let (lo, hi) = entry.samples.x_range();
    let x = linspace(lo, hi, GRID_POINTS);
    let y = entry.fit.polynomial.evaluate_many(&x);

    CurveFile {
        tool: "poly".to_string(),
        labels: entry.labels.clone(),
        degree: entry.fit.degree,
        coefficients: entry.fit.coefficients().to_vec(),
        r_squared: entry.fit.r_squared,
        n: entry.fit.n,
        recorded_at: entry.recorded_at,
        grid: CurveGrid { x, y },
    }
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, entry: &FitHistoryEntry) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &curve_file(entry))
        .map_err(|e| AppError::Io(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::Io(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::invalid(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}
