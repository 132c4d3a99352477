//! Mathematical utilities: small-matrix algebra and basis terms.

pub mod basis;
pub mod matrix;

pub use basis::*;
pub use matrix::*;
