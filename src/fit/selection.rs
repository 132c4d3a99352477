//! Fit every catalog model and rank them by R².
//!
//! Guardrails before a model enters the ranking:
//! 1. Skip underdetermined models: require `n >= k`
//! 2. Skip models whose fit produced no coefficients
//! 3. Skip models whose R² is not finite (singular `XᵀX`, malformed points)
//!
//! Ranking is by R² descending; ties keep catalog order.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::domain::Point;
use crate::fit::fitter::{FitOutput, fit_model};
use crate::models::{Model, all};

/// One ranked model.
#[derive(Debug, Clone)]
pub struct RankedFit {
    pub fit: FitOutput,
    pub r_squared: f64,
}

/// Output of fitting every model.
#[derive(Debug, Clone)]
pub struct Ranking {
    /// Usable fits, best first.
    pub fits: Vec<RankedFit>,
    /// Models that were skipped and why (for diagnostics).
    pub skipped: Vec<(&'static Model, String)>,
}

impl Ranking {
    pub fn best(&self) -> Option<&RankedFit> {
        self.fits.first()
    }
}

/// Fit every catalog model (in parallel) and rank the usable ones.
pub fn rank_models(points: &[Point]) -> Ranking {
    let outcomes: Vec<(&'static Model, Result<RankedFit, String>)> = all()
        .par_iter()
        .map(|model| (model, evaluate(points, model)))
        .collect();

    let mut fits = Vec::new();
    let mut skipped = Vec::new();
    for (model, outcome) in outcomes {
        match outcome {
            Ok(ranked) => fits.push(ranked),
            Err(reason) => skipped.push((model, reason)),
        }
    }

    // Stable sort: equal R² keeps catalog order.
    fits.sort_by(|a, b| {
        b.r_squared
            .partial_cmp(&a.r_squared)
            .unwrap_or(Ordering::Equal)
    });

    Ranking { fits, skipped }
}

fn evaluate(points: &[Point], model: &'static Model) -> Result<RankedFit, String> {
    let n = points.len();
    let k = model.term_count();
    if n < k {
        return Err(format!("Underdetermined: n={n} < k={k}"));
    }

    let fit = fit_model(points, model);
    match fit.r_squared {
        None => Err("No coefficients".to_string()),
        Some(r2) if !r2.is_finite() => Err(format!("Non-finite R² ({r2})")),
        Some(r_squared) => Ok(RankedFit { fit, r_squared }),
    }
}
