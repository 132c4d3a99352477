//! Export per-point results to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::AppError;
use crate::report::PointResidual;

/// Write per-point results (`x,y,y_fit,residual`) to a CSV file.
pub fn write_results_csv(path: &Path, residuals: &[PointResidual]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(BufWriter::new(file), residuals)
}

fn write_results<W: Write>(mut out: W, residuals: &[PointResidual]) -> Result<(), AppError> {
    let write_err = |e: std::io::Error| AppError::usage(format!("Failed to write export CSV: {e}"));

    writeln!(out, "x,y,y_fit,residual").map_err(write_err)?;
    for r in residuals {
        writeln!(
            out,
            "{},{},{:.10},{:.10}",
            r.point.x, r.point.y, r.y_fit, r.residual
        )
        .map_err(write_err)?;
    }
    out.flush().map_err(write_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Point;

    #[test]
    fn writes_header_and_one_row_per_point() {
        let rows = [
            PointResidual {
                point: Point::new(1.0, 2.5),
                y_fit: 2.0,
                residual: 0.5,
            },
            PointResidual {
                point: Point::new(f64::NAN, 1.0),
                y_fit: f64::NAN,
                residual: f64::NAN,
            },
        ];
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "x,y,y_fit,residual");
        assert_eq!(lines[1], "1,2.5,2.0000000000,0.5000000000");
        assert_eq!(lines[2], "NaN,1,NaN,NaN");
    }
}
