//! Shared "fit pipeline" logic used by both the CLI and the web front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! samples -> fit/select -> history entry -> rendered image
//!
//! The front-ends can then focus on presentation (printing vs HTML).

use tracing::{info, warn};

use crate::domain::{DegreeSpec, FitHistoryEntry, PlotLabels, SampleSet};
use crate::error::AppError;
use crate::fit::selection::{FitSelection, fit_and_select};
use crate::plot::{ChartRenderer, ImageStore, PlotSize, StoredImage};

/// All computed outputs of a single fit request.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub selection: FitSelection,
    /// The chosen fit packaged for the history store.
    pub entry: FitHistoryEntry,
}

/// Fit `samples` at `degree` and package the best result with its labels.
pub fn run_fit(samples: SampleSet, degree: DegreeSpec, labels: PlotLabels) -> Result<FitRun, AppError> {
    let selection = fit_and_select(&samples, degree)?;
    info!(
        requested = %degree,
        degree = selection.best.degree,
        r_squared = selection.best.r_squared,
        n = samples.len(),
        "fit complete"
    );

    let entry = FitHistoryEntry::new(labels, samples, selection.best.clone());
    Ok(FitRun { selection, entry })
}

/// Render the two-panel chart for one fit into a fresh image.
pub fn render_fit_image(
    store: &ImageStore,
    renderer: &dyn ChartRenderer,
    entry: &FitHistoryEntry,
    size: PlotSize,
) -> Result<StoredImage, AppError> {
    let image = store.allocate("fit")?;
    let rendered = renderer.render_fit(&image.path, &entry.samples, &entry.fit, &entry.labels, size);
    finish(image, rendered)
}

/// Render every recorded fit on one chart into a fresh image.
pub fn render_overlay_image(
    store: &ImageStore,
    renderer: &dyn ChartRenderer,
    entries: &[FitHistoryEntry],
    size: PlotSize,
) -> Result<StoredImage, AppError> {
    if entries.is_empty() {
        return Err(AppError::invalid("No fits to overlay yet."));
    }
    let image = store.allocate("overlay")?;
    let rendered = renderer.render_overlay(&image.path, entries, size);
    finish(image, rendered)
}

fn finish(image: StoredImage, rendered: Result<(), AppError>) -> Result<StoredImage, AppError> {
    if let Err(err) = rendered {
        // A half-written PNG is worse than none.
        if let Err(e) = std::fs::remove_file(&image.path) {
            warn!(path = %image.path.display(), error = %e, "could not remove failed render");
        }
        return Err(err);
    }
    Ok(image)
}
