//! Chart data preparation.
//!
//! Everything the renderer draws is computed here first (grids, curve points,
//! axis bounds) so the drawing code stays focused on styling and the numbers
//! can be tested without producing an image.

use crate::models::Polynomial;

/// Points used to draw each fitted curve.
pub const CURVE_RESOLUTION: usize = 500;

/// Relative padding added around data bounds.
const PAD_FRACTION: f64 = 0.05;

/// `n` evenly spaced values from `lo` to `hi` inclusive.
pub fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}

/// Widen an empty x-range so a single distinct x still yields a visible curve.
pub fn x_span(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

/// Sample `polynomial` over `[lo, hi]` at `CURVE_RESOLUTION` points.
pub fn curve_points(polynomial: &Polynomial, lo: f64, hi: f64) -> Vec<(f64, f64)> {
    let (lo, hi) = x_span(lo, hi);
    linspace(lo, hi, CURVE_RESOLUTION)
        .into_iter()
        .map(|x| (x, polynomial.evaluate(x)))
        .collect()
}

/// Min/max of the finite values with a little padding; never an empty range.
pub fn padded_bounds(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= 0.0 {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * PAD_FRACTION };
        return (lo - pad, hi + pad);
    }
    let pad = span * PAD_FRACTION;
    (lo - pad, hi + pad)
}
