//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{ModelResult, ModelingReport};
use crate::io::ingest::IngestedData;

/// Format the full run summary (data quality + model diagnostics + chosen model).
pub fn format_report_summary(species: &str, report: &ModelingReport) -> String {
    let mut out = String::new();
    let q = &report.data_quality;

    out.push_str(&format!("=== Growth model: {species} ===\n"));
    out.push_str(&format!(
        "Data: n={} | time span={:.2} | growth rate={:.4}/step | mean length={:.2} | CV={:.3}\n",
        q.sample_size, q.time_span, q.growth_rate, q.mean_length, q.variability
    ));

    out.push_str("\nModel diagnostics:\n");
    for (i, m) in report.models.iter().enumerate() {
        let chosen = if i == report.best_index { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<34} R²={:>9.4}  {}\n",
            m.name,
            m.r_squared,
            m.equation
        ));
        for d in &m.degeneracies {
            out.push_str(&format!("    (warning) {}\n", d.describe()));
        }
    }

    let best = report.best_model();
    out.push_str("\nChosen model:\n");
    out.push_str(&format!("- {} ({})\n", best.name, best.kind));
    out.push_str(&format!("- equation: {}\n", best.equation));
    out.push_str(&format!("- {}\n", best.analysis));

    if !report.recommendations.is_empty() {
        out.push_str("\nRecommendations:\n");
        for r in &report.recommendations {
            out.push_str(&format!("- {r}\n"));
        }
    }

    out
}

/// Format the first `limit` predictions of a model as a table.
pub fn format_predictions(model: &ModelResult, limit: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Predictions ({}):\n", model.name));
    out.push_str(&format!(
        "{:>10} {:>12} {:>12} {:>12}\n",
        "time", "predicted", "lower", "upper"
    ));
    out.push_str(&format!("{:-<10} {:-<12} {:-<12} {:-<12}\n", "", "", "", ""));

    for p in model.predictions.iter().take(limit) {
        out.push_str(&format!(
            "{:>10.2} {:>12.3} {:>12.3} {:>12.3}\n",
            p.time_point, p.predicted_length, p.confidence_interval.lower, p.confidence_interval.upper
        ));
    }
    if model.predictions.len() > limit {
        out.push_str(&format!("... {} more\n", model.predictions.len() - limit));
    }
    out
}

/// One-line ingest summary.
pub fn format_ingest_summary(ingest: &IngestedData, species_count: usize) -> String {
    let mut out = format!(
        "Read {} rows: {} usable, {} rejected, {} species\n",
        ingest.rows_read,
        ingest.observations.len(),
        ingest.row_errors.len(),
        species_count
    );
    for e in ingest.row_errors.iter().take(5) {
        out.push_str(&format!("  line {}: {}\n", e.line, e.message));
    }
    if ingest.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", ingest.row_errors.len() - 5));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelingConfig;
    use crate::domain::GrowthObservation;
    use crate::fit::build_report;

    fn report() -> ModelingReport {
        let data: Vec<GrowthObservation> = [(0.0, 5.0), (10.0, 7.5), (20.0, 11.0), (30.0, 14.0)]
            .iter()
            .map(|&(t, l)| GrowthObservation::new("bass", t, l))
            .collect();
        build_report(&data, &ModelingConfig::default()).unwrap()
    }

    #[test]
    fn summary_marks_exactly_one_best_model() {
        let r = report();
        let txt = format_report_summary("bass", &r);
        assert!(txt.starts_with("=== Growth model: bass ==="));
        let starred = txt.lines().filter(|l| l.starts_with('*')).count();
        assert_eq!(starred, 1);
        assert!(txt.contains(&r.best_model().equation));
        // n = 4 < 10
        assert!(txt.contains("Recommendations:"));
    }

    #[test]
    fn predictions_table_truncates() {
        let r = report();
        let txt = format_predictions(r.best_model(), 3);
        assert_eq!(txt.lines().count(), 3 + 3 + 1);
        assert!(txt.ends_with("... 27 more\n"));
    }
}
