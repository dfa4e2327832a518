//! Mathematical utilities: Gaussian elimination and regression statistics.

pub mod gauss;
pub mod stats;

pub use gauss::solve;
pub use stats::*;
