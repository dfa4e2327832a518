//! CSV/JSON ingest and normalization.
//!
//! This module is responsible for turning an uploaded measurement file into a
//! clean set of `GrowthObservation`s that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required fields (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Order preserving**: rows keep their file order, which the modeling
//!   output depends on
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde_json::Value;
use tracing::warn;

use crate::domain::{GrowthObservation, InputFormat};
use crate::error::AppError;

const SPECIES_ALIASES: [&str; 2] = ["species_name", "species"];
const TIME_ALIASES: [&str; 3] = ["time_point", "time", "day"];
const LENGTH_ALIASES: [&str; 1] = ["length"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line (CSV) or 1-based array position (JSON).
    pub line: usize,
    pub message: String,
}

/// Ingest output: normalized observations + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub observations: Vec<GrowthObservation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl IngestedData {
    fn finish(observations: Vec<GrowthObservation>, row_errors: Vec<RowError>, rows_read: usize) -> Result<Self, AppError> {
        for e in &row_errors {
            warn!(line = e.line, "skipped row: {}", e.message);
        }
        if observations.is_empty() {
            return Err(AppError::new(3, "No valid rows remain after validation."));
        }
        Ok(Self {
            observations,
            row_errors,
            rows_read,
        })
    }
}

/// Open `path` and parse it. Without an explicit format, `.json` files are
/// read as JSON and everything else as CSV.
pub fn load_observations(path: &Path, format: Option<InputFormat>) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;

    let format = format.unwrap_or_else(|| infer_format(path));
    match format {
        InputFormat::Csv => read_observations_csv(file),
        InputFormat::Json => read_observations_json(file),
    }
}

fn infer_format(path: &Path) -> InputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
        _ => InputFormat::Csv,
    }
}

/// Parse CSV with a `species_name,time_point,length` header (any column order).
pub fn read_observations_csv<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let species_idx = resolve_column(&header_map, &SPECIES_ALIASES)?;
    let time_idx = resolve_column(&header_map, &TIME_ALIASES)?;
    let length_idx = resolve_column(&header_map, &LENGTH_ALIASES)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1, records are 1-based after it.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_record(&record, species_idx, time_idx, length_idx) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    IngestedData::finish(observations, row_errors, rows_read)
}

/// Parse a JSON array of `{species_name, time_point, length}` objects.
///
/// Numeric fields may also be given as numeric strings.
pub fn read_observations_json<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    let value: Value =
        serde_json::from_reader(reader).map_err(|e| AppError::new(2, format!("Invalid JSON input: {e}")))?;
    let Value::Array(rows) = value else {
        return Err(AppError::new(2, "JSON input must be an array of observation objects."));
    };

    let mut observations = Vec::with_capacity(rows.len());
    let mut row_errors = Vec::new();
    let rows_read = rows.len();

    for (idx, row) in rows.iter().enumerate() {
        let line = idx + 1;
        match parse_json_row(row) {
            Ok(obs) => observations.push(obs),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    IngestedData::finish(observations, row_errors, rows_read)
}

/// Group observations by species, keeping first-appearance order of species
/// and file order inside each group.
pub fn group_by_species(observations: &[GrowthObservation]) -> Vec<(String, Vec<GrowthObservation>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<GrowthObservation>)> = Vec::new();

    for o in observations {
        let slot = *index.entry(o.species_name.as_str()).or_insert_with(|| {
            groups.push((o.species_name.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(o.clone());
    }
    groups
}

/// Keep only `species` (case-insensitive, trimmed).
pub fn filter_species(observations: &[GrowthObservation], species: &str) -> Vec<GrowthObservation> {
    let wanted = species.trim();
    observations
        .iter()
        .filter(|o| o.species_name.trim().eq_ignore_ascii_case(wanted))
        .cloned()
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Result<usize, AppError> {
    aliases
        .iter()
        .find_map(|a| header_map.get(*a).copied())
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{}`", aliases[0])))
}

fn parse_record(
    record: &StringRecord,
    species_idx: usize,
    time_idx: usize,
    length_idx: usize,
) -> Result<GrowthObservation, String> {
    let species = record
        .get(species_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `species_name`".to_string())?;
    let time_point = parse_number(record.get(time_idx), "time_point")?;
    let length = parse_number(record.get(length_idx), "length")?;
    Ok(GrowthObservation::new(species, time_point, length))
}

fn parse_json_row(row: &Value) -> Result<GrowthObservation, String> {
    let Value::Object(map) = row else {
        return Err("Row is not an object.".to_string());
    };

    let species = SPECIES_ALIASES
        .iter()
        .find_map(|k| map.get(*k))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `species_name`".to_string())?;

    let time_point = json_number(TIME_ALIASES.iter().find_map(|k| map.get(*k)), "time_point")?;
    let length = json_number(LENGTH_ALIASES.iter().find_map(|k| map.get(*k)), "length")?;
    Ok(GrowthObservation::new(species, time_point, length))
}

fn json_number(value: Option<&Value>, name: &str) -> Result<f64, String> {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| format!("Invalid `{name}` value.")),
        Some(Value::String(s)) => parse_number(Some(s.trim()), name),
        Some(_) => Err(format!("Invalid `{name}` value.")),
        None => Err(format!("Missing required value: `{name}`")),
    }
}

fn parse_number(s: Option<&str>, name: &str) -> Result<f64, String> {
    let s = s
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))?;
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid `{name}` value '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite `{name}` value."))
    }
}
