//! Export predictions to CSV and full reports to JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets; the JSON keeps the
//! whole `ModelingReport` plus a little run metadata.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::{ModelResult, ModelingReport};
use crate::error::AppError;

/// JSON document written by `write_report_json`.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub tool: &'static str,
    pub species: &'a str,
    pub generated_at: DateTime<Local>,
    pub best_model: &'a str,
    pub report: &'a ModelingReport,
}

/// Write one model's predictions as
/// `time_point,predicted_length,confidence_lower,confidence_upper` rows.
pub fn write_predictions_csv<W: Write>(mut out: W, model: &ModelResult) -> Result<(), AppError> {
    writeln!(out, "time_point,predicted_length,confidence_lower,confidence_upper")
        .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV header: {e}")))?;

    for p in &model.predictions {
        writeln!(
            out,
            "{},{:.4},{:.4},{:.4}",
            p.time_point, p.predicted_length, p.confidence_interval.lower, p.confidence_interval.upper,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write predictions CSV row: {e}")))?;
    }
    Ok(())
}

/// Serialize the report (pretty-printed).
pub fn write_report_json<W: Write>(
    out: W,
    species: &str,
    report: &ModelingReport,
    generated_at: DateTime<Local>,
) -> Result<(), AppError> {
    let doc = ReportDocument {
        tool: "growth",
        species,
        generated_at,
        best_model: &report.best_model().name,
        report,
    };
    serde_json::to_writer_pretty(out, &doc).map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))
}

/// Create `path` for writing, wrapped in a buffer.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, AppError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))
}
