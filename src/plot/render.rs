//! PNG rendering with Plotters' bitmap backend.
//!
//! All series and bounds come from `plot::series`; this module only lays out
//! panels and applies styling.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::{FitHistoryEntry, FitResult, PlotLabels, SampleSet};
use crate::error::AppError;
use crate::plot::series::{curve_points, padded_bounds, x_span};

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotSize {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 500,
        }
    }
}

fn render_err(e: impl std::fmt::Display) -> AppError {
    AppError::Render(e.to_string())
}

/// Draws charts into image files.
///
/// The web front-end holds one of these so request handling does not depend
/// on a particular drawing backend.
pub trait ChartRenderer: Send + Sync + std::fmt::Debug {
    fn render_fit(
        &self,
        path: &Path,
        samples: &SampleSet,
        fit: &FitResult,
        labels: &PlotLabels,
        size: PlotSize,
    ) -> Result<(), AppError>;

    fn render_overlay(&self, path: &Path, entries: &[FitHistoryEntry], size: PlotSize) -> Result<(), AppError>;
}

/// PNG output through Plotters' bitmap backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlottersRenderer;

impl ChartRenderer for PlottersRenderer {
    fn render_fit(
        &self,
        path: &Path,
        samples: &SampleSet,
        fit: &FitResult,
        labels: &PlotLabels,
        size: PlotSize,
    ) -> Result<(), AppError> {
        render_fit(path, samples, fit, labels, size)
    }

    fn render_overlay(&self, path: &Path, entries: &[FitHistoryEntry], size: PlotSize) -> Result<(), AppError> {
        render_overlay(path, entries, size)
    }
}

/// Two panels side by side: the raw points, then the points with the fitted curve.
pub fn render_fit(
    path: &Path,
    samples: &SampleSet,
    fit: &FitResult,
    labels: &PlotLabels,
    size: PlotSize,
) -> Result<(), AppError> {
    let (x_lo, x_hi) = samples.x_range();
    let curve = curve_points(&fit.polynomial, x_lo, x_hi);

    let (span_lo, span_hi) = x_span(x_lo, x_hi);
    let (x0, x1) = padded_bounds([span_lo, span_hi]);
    let (y0, y1) = padded_bounds(samples.ys().iter().copied().chain(curve.iter().map(|&(_, y)| y)));

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;
    let root = root
        .titled(&format!("y = {}", fit.polynomial), ("sans-serif", 16).into_font())
        .map_err(render_err)?;

    let (left, right) = root.split_horizontally(size.width / 2);

    let mut points_chart = ChartBuilder::on(&left)
        .caption(format!("{} - points only", labels.title), ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;
    points_chart
        .configure_mesh()
        .x_desc(&labels.x_label)
        .y_desc(&labels.y_label)
        .draw()
        .map_err(render_err)?;
    points_chart
        .draw_series(samples.points().map(|p| Circle::new(p, 4, BLUE.filled())))
        .map_err(render_err)?;

    let mut fit_chart = ChartBuilder::on(&right)
        .caption(
            format!("{} | degree {}, R²={:.4}", labels.title, fit.degree, fit.r_squared),
            ("sans-serif", 20).into_font(),
        )
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;
    fit_chart
        .configure_mesh()
        .x_desc(&labels.x_label)
        .y_desc(&labels.y_label)
        .draw()
        .map_err(render_err)?;
    fit_chart
        .draw_series(samples.points().map(|p| Circle::new(p, 4, BLUE.filled())))
        .map_err(render_err)?;
    fit_chart
        .draw_series(LineSeries::new(curve, RED.stroke_width(2)))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Every recorded fit on one chart, each over its own sample x-range.
pub fn render_overlay(path: &Path, entries: &[FitHistoryEntry], size: PlotSize) -> Result<(), AppError> {
    let Some(first) = entries.first() else {
        return Err(AppError::invalid("No fits to overlay yet."));
    };

    let curves: Vec<(String, Vec<(f64, f64)>)> = entries
        .iter()
        .map(|e| {
            let (lo, hi) = e.samples.x_range();
            (e.legend(), curve_points(&e.fit.polynomial, lo, hi))
        })
        .collect();

    let (x0, x1) = padded_bounds(curves.iter().flat_map(|(_, c)| c.iter().map(|&(x, _)| x)));
    let (y0, y1) = padded_bounds(curves.iter().flat_map(|(_, c)| c.iter().map(|&(_, y)| y)));

    let root = BitMapBackend::new(path, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Fit comparison", ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .x_desc(&first.labels.x_label)
        .y_desc(&first.labels.y_label)
        .draw()
        .map_err(render_err)?;

    for (i, (legend, curve)) in curves.into_iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        chart
            .draw_series(LineSeries::new(curve, color.stroke_width(2)))
            .map_err(render_err)?
            .label(legend)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
