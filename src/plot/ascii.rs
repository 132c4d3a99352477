//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - axes through the origin: `|`, `-`, `+`
//! - fitted curve: `*`
//! - observed points: `o`
//!
//! Axis ranges always include the origin and leave 10% headroom past the
//! furthest point: `max = 1.1·max(v)`, `min = 1.1·min(0, v)`, with `NaN`
//! coordinates counted as `0`.

use crate::domain::{CurveFile, Point};
use crate::models::TrendFn;

/// Render points plus an optional fitted curve.
pub fn render_ascii_plot(
    points: &[Point],
    trend: Option<&TrendFn>,
    width: usize,
    height: usize,
) -> String {
    let frame = Frame::new(points.iter().map(|p| (p.x, p.y)), width, height);
    let curve = trend.map(|t| t.sample(frame.x_min, frame.x_max, frame.width));
    frame.render(points, curve.as_deref())
}

/// Render a saved curve file, optionally with overlay points.
///
/// Without points the axis ranges come from the saved grid.
pub fn render_ascii_plot_from_curve_file(
    curve: &CurveFile,
    points: &[Point],
    width: usize,
    height: usize,
) -> String {
    let grid: Vec<(f64, f64)> = curve
        .grid
        .x
        .iter()
        .zip(&curve.grid.y)
        .map(|(&x, &y)| (x, y))
        .collect();

    let frame = if points.is_empty() {
        Frame::new(grid.iter().copied(), width, height)
    } else {
        Frame::new(points.iter().map(|p| (p.x, p.y)), width, height)
    };
    frame.render(points, Some(grid.as_slice()))
}

struct Frame {
    width: usize,
    height: usize,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn new(values: impl Iterator<Item = (f64, f64)> + Clone, width: usize, height: usize) -> Self {
        let (x_min, x_max) = axis_range(values.clone().map(|(x, _)| x));
        let (y_min, y_max) = axis_range(values.map(|(_, y)| y));
        Self {
            width: width.max(10),
            height: height.max(5),
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    fn render(&self, points: &[Point], curve: Option<&[(f64, f64)]>) -> String {
        let mut grid = vec![vec![' '; self.width]; self.height];

        self.draw_axes(&mut grid);
        if let Some(curve) = curve {
            self.draw_curve(&mut grid, curve);
        }
        for p in points.iter().filter(|p| p.is_finite()) {
            if let Some((c, r)) = self.cell(p.x, p.y) {
                grid[r][c] = 'o';
            }
        }

        let mut out = format!(
            "Plot: x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}]\n",
            self.x_min, self.x_max, self.y_min, self.y_max
        );
        for row in grid {
            out.push_str(&row.into_iter().collect::<String>());
            out.push('\n');
        }
        out
    }

    fn draw_axes(&self, grid: &mut [Vec<char>]) {
        let col = (self.x_min..=self.x_max)
            .contains(&0.0)
            .then(|| map_x(0.0, self.x_min, self.x_max, self.width));
        let row = (self.y_min..=self.y_max)
            .contains(&0.0)
            .then(|| map_y(0.0, self.y_min, self.y_max, self.height));

        if let Some(c) = col {
            for line in grid.iter_mut() {
                line[c] = '|';
            }
        }
        if let Some(r) = row {
            for (c, cell) in grid[r].iter_mut().enumerate() {
                *cell = if Some(c) == col { '+' } else { '-' };
            }
        }
    }

    fn draw_curve(&self, grid: &mut [Vec<char>], curve: &[(f64, f64)]) {
        let mut prev = None;
        for &(x, y) in curve {
            let Some((c, r)) = self.cell(x, y) else {
                // Leaves the frame (or is undefined): break the line here.
                prev = None;
                continue;
            };
            match prev {
                Some((c0, r0)) => draw_line(grid, c0, r0, c, r, '*'),
                None => grid[r][c] = '*',
            }
            prev = Some((c, r));
        }
    }

    /// Grid cell for a finite in-range coordinate.
    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let inside = (self.x_min..=self.x_max).contains(&x) && (self.y_min..=self.y_max).contains(&y);
        inside.then(|| {
            (
                map_x(x, self.x_min, self.x_max, self.width),
                map_y(y, self.y_min, self.y_max, self.height),
            )
        })
    }
}

/// Axis range for one coordinate: origin included, 10% headroom.
pub fn axis_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .map(|v| if v.is_nan() { 0.0 } else { v })
        .fold((0.0_f64, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let min = lo * 1.1;
    let max = hi * 1.1;

    // No points, or every point at/below zero: lift the top to keep a usable span.
    if max > min {
        (min, max)
    } else if min < 0.0 {
        (min, 0.0)
    } else {
        (min, min + 1.0)
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            *cell = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
