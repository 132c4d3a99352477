//! Model evaluation.
//!
//! Fitting relies on two primitive operations per model:
//! - build a design row for a point (the feature transform)
//! - predict `y(x)` from fitted coefficients (the trend function)
//!
//! Both walk the same list of basis terms, so column `i` of the design matrix and
//! coefficient `i` of the trend function always mean the same thing.

use crate::domain::Point;
use crate::math::{Matrix, Term};
use crate::report::nice_number;

/// A catalog entry: a curve shape that is linear in its coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Model {
    /// Stable identifier, e.g. `y=b1+b2x`.
    pub key: &'static str,
    /// Human-readable form of the equation.
    pub label: &'static str,
    /// Basis terms in design-matrix column order.
    pub terms: &'static [Term],
}

impl Model {
    /// Number of coefficients (design-matrix columns).
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Feature transform: the design row for one point. Only `x` is used.
    pub fn feature_row(&self, point: Point) -> Vec<f64> {
        self.terms.iter().map(|term| term.eval(point.x)).collect()
    }

    /// Design matrix `X` (one row per point). No points gives the empty matrix.
    pub fn design_matrix(&self, points: &[Point]) -> Matrix {
        Matrix::from_fn(points.len(), self.term_count(), |r, c| {
            self.terms[c].eval(points[r].x)
        })
    }

    /// Build the prediction function from a `k×1` coefficient vector.
    ///
    /// Returns `None` when `beta` is empty or does not match the model's term count.
    pub fn trend_fn(&self, beta: &Matrix) -> Option<TrendFn> {
        if beta.is_empty() || beta.shape() != (self.term_count(), 1) {
            return None;
        }
        Some(TrendFn {
            terms: self.terms,
            coefficients: beta.as_slice().to_vec(),
        })
    }

    /// Render the fitted equation, e.g. `y = 0.3333333333333333 + 1.5x`.
    pub fn format_coefficients(&self, beta: &Matrix) -> Option<String> {
        let trend = self.trend_fn(beta)?;

        let mut out = String::from("y = ");
        for (i, (term, &b)) in self.terms.iter().zip(trend.coefficients()).enumerate() {
            if i == 0 {
                out.push_str(&nice_number(b));
            } else {
                out.push_str(if b < 0.0 { " - " } else { " + " });
                out.push_str(&nice_number(b.abs()));
            }
            out.push_str(&term.suffix());
        }
        Some(out)
    }
}

/// Fitted curve `y(x) = Σ βᵢ·gᵢ(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendFn {
    terms: &'static [Term],
    coefficients: Vec<f64>,
}

impl TrendFn {
    pub fn eval(&self, x: f64) -> f64 {
        self.terms
            .iter()
            .zip(&self.coefficients)
            .map(|(term, b)| term.eval(x) * b)
            .sum()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Sample the curve at `n` evenly spaced x values in `[x_min, x_max]`.
    pub fn sample(&self, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                let x = x_min + u * (x_max - x_min);
                (x, self.eval(x))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUADRATIC: Model = Model {
        key: "test-quadratic",
        label: "y = β₁ + β₂·x + β₃·x²",
        terms: &[Term::One, Term::X, Term::Square],
    };

    #[test]
    fn design_matrix_rows_are_feature_rows() {
        let points = [Point::new(2.0, 0.0), Point::new(-1.0, 9.0)];
        let x = QUADRATIC.design_matrix(&points);
        assert_eq!(x.shape(), (2, 3));
        for (row, p) in x.rows().zip(points) {
            assert_eq!(row, QUADRATIC.feature_row(p).as_slice());
        }
        assert!(QUADRATIC.design_matrix(&[]).is_empty());
    }

    #[test]
    fn trend_fn_requires_matching_coefficients() {
        assert!(QUADRATIC.trend_fn(&Matrix::empty()).is_none());
        assert!(QUADRATIC.trend_fn(&Matrix::column(&[1.0, 2.0])).is_none());

        let trend = QUADRATIC.trend_fn(&Matrix::column(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(trend.eval(2.0), 1.0 + 4.0 + 12.0);
    }

    #[test]
    fn coefficients_render_with_signs() {
        let beta = Matrix::column(&[1.5, -2.0, 0.25]);
        assert_eq!(
            QUADRATIC.format_coefficients(&beta).unwrap(),
            "y = 1.5 - 2x + 0.25x^2"
        );
        assert!(QUADRATIC.format_coefficients(&Matrix::empty()).is_none());
    }

    #[test]
    fn sample_spans_the_requested_range() {
        let trend = QUADRATIC.trend_fn(&Matrix::column(&[0.0, 1.0, 0.0])).unwrap();
        let curve = trend.sample(-1.0, 1.0, 5);
        assert_eq!(curve.len(), 5);
        assert_eq!(curve[0], (-1.0, -1.0));
        assert_eq!(curve[2], (0.0, 0.0));
        assert_eq!(curve[4], (1.0, 1.0));
    }
}
