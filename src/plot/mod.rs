//! Chart output.
//!
//! - `series`: grids, sampled curves and axis bounds
//! - `render`: Plotters PNG rendering (single fit, overlay)
//! - `store`: image directory + randomized file names

pub mod render;
pub mod series;
pub mod store;

pub use render::*;
pub use series::*;
pub use store::*;
