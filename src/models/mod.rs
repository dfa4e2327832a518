//! Growth curve families.
//!
//! Models are implemented as small, pure functions over `GrowthCurve` so that
//! fitting and reporting code can stay generic.

pub mod model;

pub use model::*;
