//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a single polynomial degree and score it (`fitter`)
//! - search degrees 1..=3 and keep the best R² (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
