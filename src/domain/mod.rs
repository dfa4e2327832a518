//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the observation type fed to the fitters (`GrowthObservation`)
//! - fitted curve parameters (`GrowthCurve`, `ModelKind`)
//! - fit outputs (`ModelResult`, `Prediction`, `ModelingReport`, etc.)

pub mod types;

pub use types::*;
