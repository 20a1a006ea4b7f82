//! Design matrices for polynomial regression.

use nalgebra::DMatrix;

/// Build the Vandermonde matrix for `degree`.
///
/// Columns run from `x^degree` down to `x^0`, so a least squares solution is
/// already in highest-power-first order.
pub fn vandermonde(xs: &[f64], degree: usize) -> DMatrix<f64> {
    let cols = degree + 1;
    DMatrix::from_fn(xs.len(), cols, |row, col| {
        let power = (degree - col) as i32;
        xs[row].powi(power)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_highest_power_first() {
        let m = vandermonde(&[2.0, 3.0], 2);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(0, 0)], 4.0);
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(0, 2)], 1.0);
        assert_eq!(m[(1, 0)], 9.0);
    }

    #[test]
    fn degree_zero_is_a_column_of_ones() {
        let m = vandermonde(&[5.0, -1.0, 0.0], 0);
        assert_eq!(m.shape(), (3, 1));
        assert!(m.iter().all(|&v| v == 1.0));
    }
}
