//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One observation `(x, y)`.
///
/// Either coordinate may be `NaN` when its input token was not a number; such
/// points are kept and the `NaN` flows through every computation downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Summary stats about a point list.
///
/// Ranges only cover points with both coordinates finite.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    /// Points with a non-finite coordinate (typically malformed input lines).
    pub n_invalid: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    pub fn from_points(points: &[Point]) -> Self {
        let mut stats = Self {
            n_points: points.len(),
            n_invalid: 0,
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for p in points {
            if !p.is_finite() {
                stats.n_invalid += 1;
                continue;
            }
            stats.x_min = stats.x_min.min(p.x);
            stats.x_max = stats.x_max.max(p.x);
            stats.y_min = stats.y_min.min(p.y);
            stats.y_max = stats.y_max.max(p.y);
        }
        stats
    }

    /// True when at least one point has finite coordinates.
    pub fn has_range(&self) -> bool {
        self.n_points > self.n_invalid
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    #[serde(deserialize_with = "nan_if_null")]
    pub sse: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub r_squared: f64,
}

/// Fitted model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveModel {
    pub key: String,
    pub label: String,
    #[serde(deserialize_with = "nan_if_null_vec")]
    pub coefficients: Vec<f64>,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub model: CurveModel,
    pub quality: FitQuality,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGrid {
    #[serde(deserialize_with = "nan_if_null_vec")]
    pub x: Vec<f64>,
    #[serde(deserialize_with = "nan_if_null_vec")]
    pub y: Vec<f64>,
}

// serde_json writes non-finite floats as `null`; read them back as NaN.
fn nan_if_null<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

fn nan_if_null_vec<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    let values = Vec::<Option<f64>>::deserialize(d)?;
    Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// A `fit` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus `.env` / defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Points file; `None` reads standard input.
    pub input: Option<PathBuf>,
    pub model_key: String,

    pub show_matrices: bool,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_curve: Option<PathBuf>,
}
