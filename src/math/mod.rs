//! Mathematical utilities: polynomial design matrices and least squares.

pub mod design;
pub mod ols;

pub use design::*;
pub use ols::*;
