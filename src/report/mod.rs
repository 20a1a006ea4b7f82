//! Reporting utilities: per-sample residuals and formatted terminal output.

pub mod format;

pub use format::*;
