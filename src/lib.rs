//! `poly-curves` library crate.
//!
//! The binary (`poly`) is a thin wrapper around this library so that:
//!
//! - fitting, rendering and the web router are testable without spawning processes
//! - the CLI and the web form share one fit pipeline

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod history;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod web;
