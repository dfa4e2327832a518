//! Standalone HTML report.
//!
//! One self-contained document (inline CSS, no scripts) with the input data,
//! the model comparison, the best model's predictions and the recommendations.

use chrono::{DateTime, Local};

use crate::domain::{GrowthObservation, ModelingReport};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;color:#1d2b36}\
table{border-collapse:collapse;margin:1em 0}\
th,td{border:1px solid #c5d3dc;padding:4px 10px;text-align:right}\
th{background:#e6f0f5}td.l{text-align:left}tr.best{background:#eaf7ea}";

/// Render the full report document.
pub fn render_html_report(
    species: &str,
    observations: &[GrowthObservation],
    report: &ModelingReport,
    generated_at: DateTime<Local>,
) -> String {
    let species = escape(species);
    let best = report.best_model();
    let q = &report.data_quality;
    let mut out = String::new();

    out.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Growth report: {species}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Growth curve report: {species}</h1>\n\
         <p>Generated {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));

    out.push_str(&format!(
        "<h2>Data quality</h2>\n<table>\n\
         <tr><th>Samples</th><th>Time span</th><th>Growth rate</th><th>Mean length</th><th>Variability (CV)</th></tr>\n\
         <tr><td>{}</td><td>{:.2}</td><td>{:.4}</td><td>{:.2}</td><td>{:.3}</td></tr>\n</table>\n",
        q.sample_size, q.time_span, q.growth_rate, q.mean_length, q.variability
    ));

    out.push_str("<h2>Models</h2>\n<table>\n<tr><th>Model</th><th>Equation</th><th>R²</th><th>Analysis</th></tr>\n");
    for (i, m) in report.models.iter().enumerate() {
        let class = if i == report.best_index { " class=\"best\"" } else { "" };
        out.push_str(&format!(
            "<tr{class}><td class=\"l\">{}</td><td class=\"l\">{}</td><td>{:.4}</td><td class=\"l\">{}</td></tr>\n",
            escape(&m.name),
            escape(&m.equation),
            m.r_squared,
            escape(&m.analysis)
        ));
    }
    out.push_str("</table>\n");

    out.push_str(&format!(
        "<h2>Predictions ({})</h2>\n<table>\n\
         <tr><th>Time</th><th>Predicted length</th><th>95% lower</th><th>95% upper</th></tr>\n",
        escape(&best.name)
    ));
    for p in &best.predictions {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td></tr>\n",
            p.time_point, p.predicted_length, p.confidence_interval.lower, p.confidence_interval.upper
        ));
    }
    out.push_str("</table>\n");

    out.push_str("<h2>Recommendations</h2>\n");
    if report.recommendations.is_empty() {
        out.push_str("<p>No issues detected.</p>\n");
    } else {
        out.push_str("<ul>\n");
        for r in &report.recommendations {
            out.push_str(&format!("<li>{}</li>\n", escape(r.message())));
        }
        out.push_str("</ul>\n");
    }

    out.push_str("<h2>Observations</h2>\n<table>\n<tr><th>Time</th><th>Length</th></tr>\n");
    for o in observations {
        out.push_str(&format!("<tr><td>{}</td><td>{}</td></tr>\n", o.time_point, o.length));
    }
    out.push_str("</table>\n</body>\n</html>\n");

    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
