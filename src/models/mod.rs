//! Trend model catalog.
//!
//! Models are plain data (a key, a label and a list of basis terms) so that the
//! fitting code can stay generic over every shape in the catalog.

pub mod catalog;
pub mod model;

pub use catalog::{DEFAULT_MODEL, all, keys, lookup, position};
pub use model::*;
