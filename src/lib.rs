//! `growth-curves` library crate.
//!
//! The binary (`growth`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the modeling core can be embedded elsewhere (a dashboard backend, notebooks)
//! - code stays easy to navigate as the project grows
//!
//! Entry point for embedding: [`fit::build_report`].

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
