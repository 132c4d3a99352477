//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - observation points (`Point`) and dataset stats
//! - fit outputs that are persisted (`CurveFile`, `CurveModel`, `FitQuality`)
//! - the run configuration (`FitConfig`)

pub mod types;

pub use types::*;
