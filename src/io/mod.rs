//! Input/output helpers.
//!
//! - CSV/JSON ingest + validation (`ingest`)
//! - prediction CSV and report JSON exports (`export`)
//! - standalone HTML report (`html`)

pub mod export;
pub mod html;
pub mod ingest;

pub use export::*;
pub use html::*;
pub use ingest::*;
