//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - solve the normal equations for one model (`fitter`)
//! - fit every catalog model and rank by R² (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
