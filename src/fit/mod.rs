//! Growth model fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit each candidate family (linear, quadratic, exponential, logistic)
//! - extrapolate predictions with confidence bands
//! - select the best model by R² and build the report

pub mod analysis;
pub mod fitter;
pub mod selection;

pub use analysis::*;
pub use fitter::*;
pub use selection::*;
