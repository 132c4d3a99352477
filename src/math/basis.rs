//! Basis terms for the model catalog.
//!
//! Every catalog model is linear in its coefficients:
//!
//! ```text
//! y(x) = β₁·g₁(x) + β₂·g₂(x) + ... + βₖ·gₖ(x)
//! ```
//!
//! The design row for a point is `[g₁(x), .., gₖ(x)]` and the fitted curve sums the
//! same terms, so both sides of a fit evaluate exactly the same function per column.
//!
//! Terms are evaluated literally. `1/0`, `√-1` or `log₁₀ 0` give `inf`/`NaN`, and
//! those values are left for the caller to surface.

/// One column of a design matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Term {
    /// Constant `1` (intercept).
    One,
    X,
    Square,
    Sqrt,
    Reciprocal,
    /// `sin(k·x)` for a fixed frequency scaling `k`.
    Sin(f64),
    /// `sin(x²)`.
    SinOfSquare,
    Cos,
    Exp,
    /// Base-10 logarithm.
    Log10,
}

impl Term {
    /// Evaluate the term at `x`.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Term::One => 1.0,
            Term::X => x,
            Term::Square => x * x,
            Term::Sqrt => x.sqrt(),
            Term::Reciprocal => 1.0 / x,
            Term::Sin(k) => (k * x).sin(),
            Term::SinOfSquare => (x * x).sin(),
            Term::Cos => x.cos(),
            Term::Exp => x.exp(),
            Term::Log10 => x.log10(),
        }
    }

    /// Text printed right after a coefficient, e.g. `x^2` in `1.5x^2`.
    pub fn suffix(self) -> String {
        match self {
            Term::One => String::new(),
            Term::X => "x".to_string(),
            Term::Square => "x^2".to_string(),
            Term::Sqrt => "x^0.5".to_string(),
            Term::Reciprocal => "/x".to_string(),
            Term::Sin(k) => format!(" sin({})", scaled_x(k)),
            Term::SinOfSquare => " sin(x^2)".to_string(),
            Term::Cos => " cos(x)".to_string(),
            Term::Exp => " e^x".to_string(),
            Term::Log10 => " log(x)".to_string(),
        }
    }
}

/// Render `k·x` compactly: `x`, `2x`, `x/4`, or `1.5x`.
fn scaled_x(k: f64) -> String {
    if k == 1.0 {
        return "x".to_string();
    }
    if k > 0.0 && k < 1.0 {
        let inv = 1.0 / k;
        if inv.fract() == 0.0 {
            return format!("x/{inv}");
        }
    }
    format!("{k}x")
}
