//! Point-list ingest.
//!
//! Input is free-form text, one point per line:
//!
//! ```text
//! 1, 2
//! 2 3.5
//! 3,5
//! ```
//!
//! Rules:
//! - blank (or whitespace-only) lines are discarded
//! - commas count as whitespace; at most two tokens are read per line
//! - a missing or non-numeric token becomes `NaN` (the point is kept)
//! - a dangling separator (`1,` or `,2`) reads as an empty token, which is `0`
//!
//! Parsing never fails; malformed lines surface later as `NaN` in the fit.
//!
//! Raw matrices (`trend solve`) use the same tokenizer but keep every token on
//! a line, so a row of `X` can be any width.

use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::domain::Point;
use crate::error::AppError;
use crate::math::Matrix;

/// Parse point text into a list of points.
pub fn parse_points(text: &str) -> Vec<Point> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = split_fields(line).into_iter();
            let x = fields.next().unwrap_or(f64::NAN);
            let y = fields.next().unwrap_or(f64::NAN);
            Point::new(x, y)
        })
        .collect()
}

/// Parse matrix text: one row per non-blank line, every token a column.
///
/// Rows of different widths are a usage error.
pub fn parse_matrix(text: &str) -> Result<Matrix, AppError> {
    let rows: Vec<Vec<f64>> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_fields)
        .collect();
    Matrix::from_rows(&rows).map_err(|e| AppError::usage(format!("Invalid matrix: {e}")))
}

/// Numeric fields of one line.
///
/// The line is trimmed, then commas and whitespace runs separate tokens. A comma
/// at either end leaves an empty token, read as `0`; anything unparsable is `NaN`.
fn split_fields(line: &str) -> Vec<f64> {
    let line = line.trim();
    let leading = line.starts_with(',');
    let trailing = line.ends_with(',');

    let inner = line.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty());
    let mut fields: Vec<f64> = Vec::new();
    if leading {
        fields.push(0.0);
    }
    fields.extend(inner.map(|t| t.parse::<f64>().unwrap_or(f64::NAN)));
    if trailing {
        fields.push(0.0);
    }
    fields
}

fn read_text(path: Option<&Path>, what: &str) -> Result<String, AppError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            AppError::usage(format!("Failed to read {what} file '{}': {e}", path.display()))
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::usage(format!("Failed to read {what} from stdin: {e}")))?;
            Ok(buf)
        }
    }
}

/// Read points from a file, or from standard input when `path` is `None`.
pub fn load_points(path: Option<&Path>) -> Result<Vec<Point>, AppError> {
    let points = parse_points(&read_text(path, "points")?);
    debug!(
        n = points.len(),
        invalid = points.iter().filter(|p| !p.is_finite()).count(),
        "points parsed"
    );
    Ok(points)
}

/// Read a matrix from a file, or from standard input when `path` is `None`.
pub fn load_matrix(path: Option<&Path>) -> Result<Matrix, AppError> {
    let matrix = parse_matrix(&read_text(path, "matrix")?)?;
    debug!(shape = ?matrix.shape(), "matrix parsed");
    Ok(matrix)
}
