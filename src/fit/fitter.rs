//! Ordinary least squares via the normal equations.
//!
//! For a model with design matrix `X` and observations `y`:
//!
//! ```text
//! β = (XᵀX)⁻¹ Xᵀ y
//! ```
//!
//! Every intermediate product is kept in the output so it can be displayed. Each
//! call recomputes everything from the points; nothing is cached between calls.
//!
//! There is no guard against singular `XᵀX` (e.g. repeated x values for a
//! two-term model). The inverse then holds `inf`/`NaN`, which propagates into β
//! and R² where it is visible to the user.

use tracing::debug;

use crate::domain::{FitQuality, Point};
use crate::error::AppError;
use crate::math::{Matrix, invert, multiply, transpose};
use crate::models::{Model, TrendFn, keys, lookup};

/// All stages of one normal-equation solve.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    /// Observations as an `n×1` column.
    pub y: Matrix,
    /// Design matrix `X` (`n×k`).
    pub x: Matrix,
    pub xt: Matrix,
    pub xtx: Matrix,
    pub xtx_inv: Matrix,
    pub xtx_inv_xt: Matrix,
    /// Coefficient vector `β` (`k×1`); empty when no fit is available.
    pub beta: Matrix,
}

/// Run `Xᵀ`, `XᵀX`, `(XᵀX)⁻¹`, `(XᵀX)⁻¹Xᵀ` and `β` in that order.
///
/// Uses the lenient algebra: a shape mismatch or an unsupported size empties the
/// downstream stages instead of failing.
pub fn solve_normal_equations(x: Matrix, y: Matrix) -> NormalEquations {
    let xt = transpose(&x);
    let xtx = multiply(&xt, &x);
    let xtx_inv = invert(&xtx);
    let xtx_inv_xt = multiply(&xtx_inv, &xt);
    let beta = multiply(&xtx_inv_xt, &y);

    NormalEquations {
        y,
        x,
        xt,
        xtx,
        xtx_inv,
        xtx_inv_xt,
        beta,
    }
}

/// A catalog model fitted to a point list.
#[derive(Debug, Clone)]
pub struct FitOutput {
    pub model: &'static Model,
    pub stages: NormalEquations,
    /// Coefficient of determination; `None` when `beta` is empty.
    pub r_squared: Option<f64>,
}

impl FitOutput {
    /// Fitted coefficients in term order.
    pub fn coefficients(&self) -> &[f64] {
        self.stages.beta.as_slice()
    }

    pub fn trend_fn(&self) -> Option<TrendFn> {
        self.model.trend_fn(&self.stages.beta)
    }

    /// Human-readable fitted equation.
    pub fn equation(&self) -> Option<String> {
        self.model.format_coefficients(&self.stages.beta)
    }

    /// Fitted values `Xβ` as an `n×1` column.
    pub fn fitted_values(&self) -> Matrix {
        multiply(&self.stages.x, &self.stages.beta)
    }

    /// Sum of squared residuals `‖y - Xβ‖²`, when a fit is available.
    pub fn sse(&self) -> Option<f64> {
        if self.stages.beta.is_empty() {
            return None;
        }
        let fitted = self.fitted_values();
        Some(
            self.stages
                .y
                .as_slice()
                .iter()
                .zip(fitted.as_slice())
                .map(|(y, f)| (y - f) * (y - f))
                .sum(),
        )
    }

    pub fn quality(&self) -> Option<FitQuality> {
        Some(FitQuality {
            n: self.stages.y.nrows(),
            sse: self.sse()?,
            r_squared: self.r_squared?,
        })
    }
}

/// Fit the catalog model named `model_key`.
pub fn fit(points: &[Point], model_key: &str) -> Result<FitOutput, AppError> {
    let model = lookup(model_key).ok_or_else(|| unknown_model(model_key))?;
    Ok(fit_model(points, model))
}

/// Error for a key that is not in the catalog.
pub fn unknown_model(model_key: &str) -> AppError {
    AppError::usage(format!(
        "Unknown model '{model_key}'. Available: {}",
        keys().collect::<Vec<_>>().join(", ")
    ))
}

/// Solve the normal equations for `model` over `points`.
///
/// Always returns a structurally valid output: with no points every matrix is
/// empty and `r_squared` is `None`.
pub fn fit_model(points: &[Point], model: &'static Model) -> FitOutput {
    let y_values: Vec<f64> = points.iter().map(|p| p.y).collect();
    let stages = solve_normal_equations(model.design_matrix(points), Matrix::column(&y_values));

    let r_squared = model
        .trend_fn(&stages.beta)
        .map(|trend| r_squared(points, &trend));
    debug!(
        model = model.key,
        n = points.len(),
        k = stages.beta.nrows(),
        r_squared = ?r_squared,
        "normal equations solved"
    );

    FitOutput {
        model,
        stages,
        r_squared,
    }
}

/// `R² = 1 - SS_res / SS_tot`.
///
/// With no points the mean is taken as `1`, both sums are zero, and the result is
/// `NaN`; callers treat a non-finite R² as "not displayable".
pub fn r_squared(points: &[Point], trend: &TrendFn) -> f64 {
    let y_mean = if points.is_empty() {
        1.0
    } else {
        points.iter().map(|p| p.y).sum::<f64>() / points.len() as f64
    };

    let ss_res: f64 = points
        .iter()
        .map(|p| {
            let r = p.y - trend.eval(p.x);
            r * r
        })
        .sum();
    let ss_tot: f64 = points
        .iter()
        .map(|p| {
            let d = p.y - y_mean;
            d * d
        })
        .sum();

    1.0 - ss_res / ss_tot
}
