//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - validated input samples (`SampleSet`) and the requested degree (`DegreeSpec`)
//! - fit outputs (`FitResult`)
//! - display metadata and history entries (`PlotLabels`, `FitHistoryEntry`)

pub mod types;

pub use types::*;
