//! Fitted model representations.

pub mod polynomial;

pub use polynomial::*;
