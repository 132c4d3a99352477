//! Shared "fit pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! points -> stats -> normal-equation solve -> residuals
//!
//! `solve` skips the catalog: the user supplies `X` and `y` directly.
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use std::path::Path;

use tracing::debug;

use crate::domain::{DatasetStats, FitConfig, Point};
use crate::error::AppError;
use crate::fit::{FitOutput, NormalEquations, fit, solve_normal_equations};
use crate::io::{load_matrix, load_points, parse_matrix};
use crate::math::Matrix;
use crate::report::{PointResidual, compute_residuals};

/// All computed outputs of a single fit.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub points: Vec<Point>,
    pub stats: DatasetStats,
    pub fit: FitOutput,
    /// Empty when the fit has no coefficients.
    pub residuals: Vec<PointResidual>,
}

/// Load the configured input and run the fit.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let points = load_points(config.input.as_deref())?;
    run_fit_with_points(points, &config.model_key)
}

/// Run the fit on points already in memory.
///
/// The TUI calls this on every edit; nothing is cached between calls.
pub fn run_fit_with_points(points: Vec<Point>, model_key: &str) -> Result<RunOutput, AppError> {
    let fit = fit(&points, model_key)?;
    let stats = DatasetStats::from_points(&points);
    let residuals = fit
        .trend_fn()
        .map(|trend| compute_residuals(&points, &trend))
        .unwrap_or_default();

    debug!(
        model = fit.model.key,
        n = stats.n_points,
        invalid = stats.n_invalid,
        "fit pipeline finished"
    );

    Ok(RunOutput {
        points,
        stats,
        fit,
        residuals,
    })
}

/// Load `X` and `y` from files and solve the normal equations.
pub fn run_solve(x_path: &Path, y_path: &Path) -> Result<NormalEquations, AppError> {
    let x = load_matrix(Some(x_path))?;
    let y = load_matrix(Some(y_path))?;
    Ok(solve_matrices(x, y))
}

/// Parse `X` and `y` from text and solve the normal equations.
pub fn run_solve_text(x_text: &str, y_text: &str) -> Result<NormalEquations, AppError> {
    Ok(solve_matrices(parse_matrix(x_text)?, parse_matrix(y_text)?))
}

fn solve_matrices(x: Matrix, y: Matrix) -> NormalEquations {
    let solve = solve_normal_equations(x, y);
    debug!(
        x = ?solve.x.shape(),
        y = ?solve.y.shape(),
        beta = ?solve.beta.shape(),
        "raw normal equations solved"
    );
    solve
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_follow_the_fit() {
        let points = vec![Point::new(1.0, 2.0), Point::new(2.0, 3.0), Point::new(3.0, 5.0)];
        let run = run_fit_with_points(points, "y=b1+b2x").unwrap();
        assert_eq!(run.residuals.len(), 3);
        assert_eq!(run.stats.n_points, 3);
        let total: f64 = run.residuals.iter().map(|r| r.residual).sum();
        assert!(total.abs() < 1e-12);
    }

    #[test]
    fn no_points_gives_no_residuals() {
        let run = run_fit_with_points(Vec::new(), "y=b1+b2x").unwrap();
        assert!(run.residuals.is_empty());
        assert!(run.fit.stages.beta.is_empty());
    }

    #[test]
    fn unknown_model_fails_before_fitting() {
        let err = run_fit_with_points(vec![Point::new(1.0, 1.0)], "nope").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn raw_two_column_design_matches_the_affine_fit() {
        let solve = run_solve_text("1, 1\n1, 2\n1, 3\n", "2\n3\n5\n").unwrap();
        assert_eq!(solve.xtx.to_rows(), vec![vec![3.0, 6.0], vec![6.0, 14.0]]);
        assert_eq!(solve.beta.shape(), (2, 1));
        assert!((solve.beta[(0, 0)] - 1.0 / 3.0).abs() < 1e-12);
        assert!((solve.beta[(1, 0)] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn four_column_design_has_no_inverse() {
        let x = "1 1 1 1\n1 2 4 8\n1 3 9 27\n1 4 16 64\n1 5 25 125\n";
        let solve = run_solve_text(x, "1\n2\n3\n4\n5\n").unwrap();
        assert_eq!(solve.xt.shape(), (4, 5));
        assert_eq!(solve.xtx.shape(), (4, 4));
        assert!(solve.xtx_inv.is_empty());
        assert!(solve.xtx_inv_xt.is_empty());
        assert!(solve.beta.is_empty());

        let text = crate::report::format_matrices(&solve);
        assert!(text.contains("(XᵀX)⁻¹ =\n(empty)\n"));
        assert!(text.ends_with("β =\n(empty)\n\n"));
    }

    #[test]
    fn ragged_design_is_rejected() {
        let err = run_solve_text("1 2\n3\n", "1\n2\n").unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn missing_matrix_file_is_a_usage_error() {
        let missing = Path::new("/nonexistent/trend/x.txt");
        let err = run_solve(missing, missing).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
