//! Input/output helpers.
//!
//! - upload decoders (`reader`)
//! - numeric list parsing into samples (`ingest`)
//! - fitted-value CSV export (`export`)
//! - curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;
pub mod reader;

pub use curve::*;
pub use export::*;
pub use ingest::*;
pub use reader::*;
