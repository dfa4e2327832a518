//! Command-line parsing for the growth curve modeler.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{InputFormat, ObservationOrder};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "growth", version, about = "Fish growth curve modeling and extrapolation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit linear, quadratic, exponential and logistic growth curves and report the best.
    Fit(FitArgs),
    /// Generate a synthetic growth series as CSV.
    Sample(SampleArgs),
}

/// Options for fitting.
///
/// Modeling options left unset fall back to `GROWTH_*` environment variables,
/// then to the built-in defaults.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Observation file (`species_name,time_point,length`).
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Input format (inferred from the extension when omitted).
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Model only this species. All species are modeled when omitted.
    #[arg(short = 's', long)]
    pub species: Option<String>,

    /// Logistic growth rate `r`.
    #[arg(long)]
    pub logistic_rate: Option<f64>,

    /// Logistic carrying capacity as a multiple of the largest observed length.
    #[arg(long)]
    pub capacity_multiplier: Option<f64>,

    /// Number of future time steps to predict.
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Observation order used for modeling.
    #[arg(long, value_enum)]
    pub order: Option<ObservationOrder>,

    /// Number of prediction rows to print.
    #[arg(long, default_value_t = 10)]
    pub show_predictions: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export the best model's predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_predictions: Option<PathBuf>,

    /// Export the full report to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_report: Option<PathBuf>,

    /// Export a standalone HTML report.
    #[arg(long, value_name = "HTML")]
    pub export_html: Option<PathBuf>,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Species name written to every row.
    #[arg(short = 's', long, default_value = "Atlantic salmon")]
    pub species: String,

    /// Number of observations.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub count: usize,

    /// Spacing between time points.
    #[arg(long, default_value_t = 7.0)]
    pub interval: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Log-scale noise standard deviation.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Output CSV (stdout when omitted).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
