//! Polynomial evaluation and display.
//!
//! Fits are solved in a centered, scaled variable `t = (x - center) / scale`
//! and evaluated in that variable, so x-values far from zero (timestamps,
//! years) neither lose rank nor cancel catastrophically. The expanded
//! coefficients in plain `x` are kept alongside for display and export.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    /// Highest power first, in plain `x`.
    coefficients: Vec<f64>,
    /// Highest power first, in `t = (x - center) / scale`.
    scaled: Vec<f64>,
    center: f64,
    scale: f64,
}

impl Polynomial {
    /// Build from coefficients in plain `x`, ordered highest power first.
    ///
    /// An empty slice is treated as the zero polynomial.
    pub fn new(coefficients: Vec<f64>) -> Self {
        let coefficients = if coefficients.is_empty() {
            vec![0.0]
        } else {
            coefficients
        };
        Self {
            scaled: coefficients.clone(),
            coefficients,
            center: 0.0,
            scale: 1.0,
        }
    }

    /// Build from coefficients in `t = (x - center) / scale`, highest power first.
    ///
    /// A zero or non-finite `scale` is treated as 1.
    pub fn from_scaled(scaled: Vec<f64>, center: f64, scale: f64) -> Self {
        let scaled = if scaled.is_empty() { vec![0.0] } else { scaled };
        let scale = if scale.is_finite() && scale != 0.0 { scale } else { 1.0 };
        Self {
            coefficients: expand(&scaled, center, scale),
            scaled,
            center,
            scale,
        }
    }

    /// Coefficients in plain `x`, highest power first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Nominal degree (coefficient count - 1), even if the leading term is zero.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate with Horner's scheme in the scaled variable.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.scaled.iter().fold(0.0, |acc, &c| acc * t + c)
    }

    pub fn evaluate_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.evaluate(x)).collect()
    }
}

/// Rewrite `Σ c_k t^k` with `t = (x - center) / scale` as coefficients in `x`.
fn expand(scaled: &[f64], center: f64, scale: f64) -> Vec<f64> {
    let a = 1.0 / scale;
    let b = -center / scale;

    // Horner over polynomials: q <- q * (a x + b) + c.
    let mut q: Vec<f64> = Vec::with_capacity(scaled.len());
    for &c in scaled {
        let mut next = vec![0.0; q.len() + 1];
        for (i, &qi) in q.iter().enumerate() {
            next[i] += a * qi;
            next[i + 1] += b * qi;
        }
        if let Some(last) = next.last_mut() {
            *last += c;
        }
        q = next;
    }
    q
}

impl fmt::Display for Polynomial {
    /// Renders e.g. `2.0000 x^2 - 0.5000 x + 1.0000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = self.degree();
        for (i, &c) in self.coefficients.iter().enumerate() {
            let power = degree - i;
            let magnitude = c.abs();
            if i == 0 {
                if c < 0.0 {
                    write!(f, "-")?;
                }
            } else if c < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            match power {
                0 => write!(f, "{magnitude:.4}")?,
                1 => write!(f, "{magnitude:.4} x")?,
                p => write!(f, "{magnitude:.4} x^{p}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horner_matches_expanded_form() {
        // 2x^2 - 3x + 1
        let p = Polynomial::new(vec![2.0, -3.0, 1.0]);
        for &x in &[-2.0, 0.0, 0.5, 3.0] {
            let expected = 2.0 * x * x - 3.0 * x + 1.0;
            assert!((p.evaluate(x) - expected).abs() < 1e-12);
        }
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn empty_coefficients_are_zero() {
        let p = Polynomial::new(vec![]);
        assert_eq!(p.degree(), 0);
        assert_eq!(p.evaluate(10.0), 0.0);
    }

    #[test]
    fn scaled_form_expands_to_plain_coefficients() {
        // ((x - 2) / 0.5)^2 + 1 = 4x^2 - 16x + 17
        let p = Polynomial::from_scaled(vec![1.0, 0.0, 1.0], 2.0, 0.5);
        let c = p.coefficients();
        assert_eq!(c.len(), 3);
        assert!((c[0] - 4.0).abs() < 1e-12);
        assert!((c[1] + 16.0).abs() < 1e-12);
        assert!((c[2] - 17.0).abs() < 1e-12);
        assert!((p.evaluate(3.0) - 5.0).abs() < 1e-12);
        assert_eq!(p.degree(), 2);
    }

    #[test]
    fn scaled_evaluation_stays_accurate_far_from_zero() {
        // (x - 1.7e9) / 86400 = 2 at the probe point, so t^3 = 8.
        let p = Polynomial::from_scaled(vec![1.0, 0.0, 0.0, 0.0], 1.7e9, 86_400.0);
        assert!((p.evaluate(1.7e9 + 2.0 * 86_400.0) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn zero_scale_falls_back_to_identity() {
        let p = Polynomial::from_scaled(vec![3.0], 5.0, 0.0);
        assert_eq!(p.evaluate(100.0), 3.0);
    }

    #[test]
    fn display_uses_signs_between_terms() {
        let p = Polynomial::new(vec![2.0, -0.5, 1.0]);
        assert_eq!(p.to_string(), "2.0000 x^2 - 0.5000 x + 1.0000");

        let neg = Polynomial::new(vec![-1.0, 3.0]);
        assert_eq!(neg.to_string(), "-1.0000 x + 3.0000");
    }
}
