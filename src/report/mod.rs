//! Reporting utilities: residuals and formatted output.

pub mod format;

pub use format::*;

use crate::domain::Point;
use crate::models::TrendFn;

/// Fitted value and residual for one input point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResidual {
    pub point: Point,
    pub y_fit: f64,
    /// `y - y_fit`
    pub residual: f64,
}

/// Compute fitted values and residuals for each point.
///
/// Non-finite predictions are kept; a malformed point shows up as `NaN` in its row.
pub fn compute_residuals(points: &[Point], trend: &TrendFn) -> Vec<PointResidual> {
    points
        .iter()
        .map(|&point| {
            let y_fit = trend.eval(point.x);
            PointResidual {
                point,
                y_fit,
                residual: point.y - y_fit,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Matrix;
    use crate::models::lookup;

    fn line(b1: f64, b2: f64) -> TrendFn {
        lookup("y=b1+b2x")
            .unwrap()
            .trend_fn(&Matrix::column(&[b1, b2]))
            .unwrap()
    }

    #[test]
    fn residuals_are_observed_minus_fitted() {
        let points = [Point::new(1.0, 3.5), Point::new(2.0, 4.0)];
        let rows = compute_residuals(&points, &line(1.0, 2.0));
        assert_eq!(rows[0].y_fit, 3.0);
        assert_eq!(rows[0].residual, 0.5);
        assert_eq!(rows[1].residual, -1.0);
    }
}
