//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{DatasetStats, Point};
use crate::fit::{FitOutput, NormalEquations, Ranking};
use crate::math::Matrix;
use crate::models::Model;
use crate::report::PointResidual;

/// Display a float without floating-point noise.
///
/// If the fractional digits of the default rendering contain a run of five `0`s
/// or five `9`s, the value is rounded to the number of decimals before the first
/// such run (`0.30000000000000004` → `0.3`, `1.4999999999999998` → `1.5`).
/// Otherwise the default rendering is kept. Zero is always `0`.
///
/// Magnitudes below `1e-6` or from `1e21` up render in exponent form (`1e-7`,
/// `2.5e+21`) and are never rounded, so a tiny coefficient does not read as `0`.
pub fn nice_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_finite() && !(1e-6..1e21).contains(&v.abs()) {
        return exponent_form(v);
    }

    let s = v.to_string();
    let Some(dp) = s.find('.') else {
        return s;
    };

    let frac = &s[dp + 1..];
    let run = [frac.find("00000"), frac.find("99999")]
        .into_iter()
        .flatten()
        .min();
    match run {
        Some(places) => format!("{v:.places$}"),
        None => s,
    }
}

/// Shortest exponent rendering with an explicit `+` on positive exponents.
fn exponent_form(v: f64) -> String {
    let s = format!("{v:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => s,
    }
}

/// Render a matrix as a bracketed table with right-aligned columns.
pub fn format_matrix(m: &Matrix) -> String {
    if m.is_empty() {
        return "(empty)\n".to_string();
    }

    let cells: Vec<Vec<String>> = m
        .rows()
        .map(|row| row.iter().map(|&v| nice_number(v)).collect())
        .collect();
    let widths: Vec<usize> = (0..m.ncols())
        .map(|c| cells.iter().map(|row| row[c].len()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in &cells {
        out.push('[');
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(&format!(" {cell:>width$}"));
        }
        out.push_str(" ]\n");
    }
    out
}

/// Every stage of the normal-equation solve, in computation order.
pub fn format_matrices(solve: &NormalEquations) -> String {
    let stages: [(&str, &Matrix); 7] = [
        ("y", &solve.y),
        ("X", &solve.x),
        ("Xᵀ", &solve.xt),
        ("XᵀX", &solve.xtx),
        ("(XᵀX)⁻¹", &solve.xtx_inv),
        ("(XᵀX)⁻¹Xᵀ", &solve.xtx_inv_xt),
        ("β", &solve.beta),
    ];

    let mut out = String::new();
    for (label, m) in stages {
        out.push_str(&format!("{label} =\n"));
        out.push_str(&format_matrix(m));
        out.push('\n');
    }
    out
}

/// R² for display; non-finite values are not displayable.
pub fn format_r_squared(r_squared: Option<f64>) -> String {
    match r_squared {
        Some(r2) if r2.is_finite() => nice_number(r2),
        Some(_) => "n/a (not finite)".to_string(),
        None => "n/a (no fit)".to_string(),
    }
}

/// Format the run summary (dataset stats + model + fitted equation + R²).
pub fn format_fit_summary(stats: &DatasetStats, fit: &FitOutput) -> String {
    let mut out = String::new();

    out.push_str("=== trend - least-squares fit ===\n");
    out.push_str(&format!("Model: {} ({})\n", fit.model.key, fit.model.label));

    out.push_str(&format!(
        "Points: n={} | invalid={}",
        stats.n_points, stats.n_invalid
    ));
    if stats.has_range() {
        out.push_str(&format!(
            " | x=[{}, {}] | y=[{}, {}]",
            nice_number(stats.x_min),
            nice_number(stats.x_max),
            nice_number(stats.y_min),
            nice_number(stats.y_max),
        ));
    }
    out.push('\n');

    match fit.equation() {
        Some(eq) => out.push_str(&format!("Equation: {eq}\n")),
        None => out.push_str("Equation: (no fit available)\n"),
    }
    out.push_str(&format!("R²: {}\n", format_r_squared(fit.r_squared)));
    if let Some(sse) = fit.sse() {
        out.push_str(&format!("SSE: {}\n", nice_number(sse)));
    }

    out
}

/// Format the per-point residual table.
pub fn format_residuals(rows: &[PointResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>12} {:>12} {:>12}\n",
        "x", "y", "y_fit", "residual"
    ));
    out.push_str(&format!("{:-<12} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "{:>12} {:>12} {:>12} {:>12}\n",
            fmt_cell(r.point.x),
            fmt_cell(r.point.y),
            fmt_cell(r.y_fit),
            fmt_cell(r.residual),
        ));
    }
    out
}

/// Format the model ranking table (top-N) and skipped models.
pub fn format_rankings(ranking: &Ranking, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:>4} {:<18} {:>10}  {}\n", "#", "model", "R²", "equation"));
    out.push_str(&format!("{:-<4} {:-<18} {:-<10}  {:-<24}\n", "", "", "", ""));
    for (i, ranked) in ranking.fits.iter().take(top_n).enumerate() {
        out.push_str(&format!(
            "{:>4} {:<18} {:>10.6}  {}\n",
            i + 1,
            ranked.fit.model.key,
            ranked.r_squared,
            ranked.fit.equation().unwrap_or_default(),
        ));
    }

    for (model, reason) in &ranking.skipped {
        out.push_str(&format!("  (skipped {}) {reason}\n", model.key));
    }

    out
}

/// One `x, y` line per point, the format the point parser reads back.
pub fn format_points(points: &[Point]) -> String {
    points.iter().map(|p| format!("{}, {}\n", p.x, p.y)).collect()
}

/// Catalog listing: key and equation form.
pub fn format_catalog(models: &[Model]) -> String {
    models
        .iter()
        .map(|m| format!("{:<18} {}\n", m.key, m.label))
        .collect()
}

fn fmt_cell(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.4}")
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit;

    #[test]
    fn nice_number_trims_float_noise() {
        assert_eq!(nice_number(0.1 + 0.2), "0.3");
        assert_eq!(nice_number(0.7 + 0.1), "0.8");
        assert_eq!(nice_number(2.9999999999), "3");
        assert_eq!(nice_number(12.000000001), "12");
        assert_eq!(nice_number(0.000001), "0");
    }

    #[test]
    fn nice_number_keeps_tiny_and_huge_values_in_exponent_form() {
        assert_eq!(nice_number(1e-7), "1e-7");
        assert_eq!(nice_number(-2.5e-9), "-2.5e-9");
        assert_eq!(nice_number(1e21), "1e+21");
        assert_eq!(nice_number(1e20), "100000000000000000000");
    }

    #[test]
    fn tiny_slope_is_not_shown_as_zero() {
        let points: Vec<Point> = (1..=5)
            .map(|i| Point::new(i as f64, 1e-7 * i as f64))
            .collect();
        let out = fit(&points, "y=b1x").unwrap();
        assert!((out.coefficients()[0] - 1e-7).abs() < 1e-18);
        let eq = out.equation().unwrap();
        assert!(eq.starts_with("y = ") && eq.ends_with('x'), "{eq}");
        assert_ne!(eq, "y = 0x");
        assert!(eq.contains('e'), "{eq}");
    }

    #[test]
    fn nice_number_keeps_ordinary_values() {
        assert_eq!(nice_number(1.0 / 3.0), "0.3333333333333333");
        assert_eq!(nice_number(1.5), "1.5");
        assert_eq!(nice_number(-2.25), "-2.25");
        assert_eq!(nice_number(3.0), "3");
    }

    #[test]
    fn nice_number_zero_and_non_finite() {
        assert_eq!(nice_number(0.0), "0");
        assert_eq!(nice_number(-0.0), "0");
        assert_eq!(nice_number(f64::NAN), "NaN");
        assert_eq!(nice_number(f64::INFINITY), "inf");
    }

    #[test]
    fn matrix_table_aligns_columns() {
        let m = Matrix::from_rows(&[vec![1.0, 10.0], vec![-2.5, 3.0]]).unwrap();
        assert_eq!(format_matrix(&m), "[    1 10 ]\n[ -2.5  3 ]\n");
        assert_eq!(format_matrix(&Matrix::empty()), "(empty)\n");
    }

    #[test]
    fn matrices_are_listed_in_solve_order() {
        let points = [Point::new(2.0, 4.0)];
        let out = fit(&points, "y=b1x").unwrap();
        let text = format_matrices(&out.stages);

        let order = ["y =", "X =", "Xᵀ =", "XᵀX =", "(XᵀX)⁻¹ =", "(XᵀX)⁻¹Xᵀ =", "β ="];
        let positions: Vec<usize> = order.iter().map(|l| text.find(l).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(text.contains("(XᵀX)⁻¹ =\n[ 0.25 ]\n"));
        assert!(text.ends_with("β =\n[ 2 ]\n\n"));
    }

    #[test]
    fn summary_without_points_reports_no_fit() {
        let out = fit(&[], "y=b1+b2x").unwrap();
        let text = format_fit_summary(&DatasetStats::from_points(&[]), &out);
        assert!(text.contains("Equation: (no fit available)"));
        assert!(text.contains("R²: n/a (no fit)"));
        assert!(!text.contains("SSE"));
    }

    #[test]
    fn points_round_trip_through_the_text_format() {
        let points = [Point::new(1.0, 2.5), Point::new(-3.0, 0.125)];
        assert_eq!(format_points(&points), "1, 2.5\n-3, 0.125\n");
    }
}
