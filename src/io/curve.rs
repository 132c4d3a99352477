//! Read/write curve JSON files.
//!
//! Curve JSON is the "portable" representation of a fitted curve:
//! - model key/label + coefficients
//! - fit quality and generation timestamp
//! - a precomputed fitted grid for quick plotting
//!
//! The schema is defined by `domain::CurveFile`. Non-finite numbers are written
//! as `null` by `serde_json`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{CurveFile, CurveGrid, CurveModel, DatasetStats};
use crate::error::AppError;
use crate::fit::FitOutput;
use crate::models::TrendFn;

const GRID_POINTS: usize = 101;

/// Build the curve file for a fit. Fails when the fit has no coefficients.
pub fn build_curve_file(fit: &FitOutput, stats: &DatasetStats) -> Result<CurveFile, AppError> {
    let no_fit = || AppError::no_data("No fitted curve to save (need at least one point).");
    let trend = fit.trend_fn().ok_or_else(no_fit)?;
    let quality = fit.quality().ok_or_else(no_fit)?;

    let (x, y) = build_grid(&trend, stats);
    Ok(CurveFile {
        tool: "trend".to_string(),
        generated_at: Utc::now(),
        model: CurveModel {
            key: fit.model.key.to_string(),
            label: fit.model.label.to_string(),
            coefficients: trend.coefficients().to_vec(),
        },
        quality,
        grid: CurveGrid { x, y },
    })
}

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, fit: &FitOutput, stats: &DatasetStats) -> Result<(), AppError> {
    let curve = build_curve_file(fit, stats)?;

    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create curve JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &curve)
        .map_err(|e| AppError::usage(format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::usage(format!("Invalid curve JSON: {e}")))?;
    Ok(curve)
}

fn build_grid(trend: &TrendFn, stats: &DatasetStats) -> (Vec<f64>, Vec<f64>) {
    let (mut x0, mut x1) = if stats.has_range() {
        (stats.x_min, stats.x_max)
    } else {
        (0.0, 1.0)
    };
    if (x1 - x0).abs() < 1e-9 {
        x0 -= 0.5;
        x1 += 0.5;
    }

    trend.sample(x0, x1, GRID_POINTS).into_iter().unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;
    use crate::fit::fit;

    #[test]
    fn curve_round_trips_through_json() {
        let points = [Point::new(1.0, 2.0), Point::new(2.0, 3.0), Point::new(3.0, 5.0)];
        let out = fit(&points, "y=b1+b2x").unwrap();
        let stats = DatasetStats::from_points(&points);

        let path = std::env::temp_dir().join(format!("trend-curve-{}.json", std::process::id()));
        write_curve_json(&path, &out, &stats).unwrap();
        let curve = read_curve_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(curve.tool, "trend");
        assert_eq!(curve.model.key, "y=b1+b2x");
        assert_eq!(curve.model.coefficients, out.coefficients());
        assert_eq!(curve.quality.n, 3);
        assert_eq!(curve.grid.x.len(), GRID_POINTS);
        assert_eq!(curve.grid.x[0], 1.0);
        assert_eq!(curve.grid.x[GRID_POINTS - 1], 3.0);
    }

    #[test]
    fn degenerate_x_range_is_widened() {
        let points = [Point::new(2.0, 4.0)];
        let out = fit(&points, "y=b1x").unwrap();
        let curve = build_curve_file(&out, &DatasetStats::from_points(&points)).unwrap();
        assert_eq!(curve.grid.x[0], 1.5);
        assert_eq!(curve.grid.x[GRID_POINTS - 1], 2.5);
        assert_eq!(curve.grid.y[GRID_POINTS - 1], 5.0);
    }

    #[test]
    fn no_points_cannot_be_saved() {
        let out = fit(&[], "y=b1").unwrap();
        let err = build_curve_file(&out, &DatasetStats::from_points(&[])).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_NO_DATA);
    }
}
