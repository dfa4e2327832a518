//! Templated interpretation text attached to each `ModelResult`.

use crate::domain::{Degeneracy, GrowthCurve};

/// Qualitative band for an R² value.
pub fn fit_quality_label(r_squared: f64) -> &'static str {
    if r_squared.is_nan() {
        "undefined"
    } else if r_squared >= 0.9 {
        "excellent"
    } else if r_squared >= 0.7 {
        "good"
    } else if r_squared >= 0.5 {
        "moderate"
    } else {
        "poor"
    }
}

/// Describe a fitted curve in one or two sentences.
pub fn describe_fit(curve: &GrowthCurve, r_squared: f64, degeneracies: &[Degeneracy]) -> String {
    let quality = fit_quality_label(r_squared);
    let mut text = match *curve {
        GrowthCurve::Linear { slope, .. } => format!(
            "Linear model shows a {quality} fit (R² = {r_squared:.4}); length changes by about {slope:.4} per time step."
        ),
        GrowthCurve::Polynomial { a2, .. } => {
            let trend = if a2 > 0.0 {
                "accelerating"
            } else if a2 < 0.0 {
                "decelerating"
            } else {
                "steady"
            };
            format!(
                "Quadratic model shows a {quality} fit (R² = {r_squared:.4}); growth is {trend} (quadratic coefficient {a2:.6})."
            )
        }
        GrowthCurve::Exponential { b, .. } => {
            let pct = (b.exp() - 1.0) * 100.0;
            format!(
                "Exponential model shows a {quality} fit (R² = {r_squared:.4}); length grows by about {pct:.2}% per time step."
            )
        }
        GrowthCurve::Logistic { k, r, .. } => format!(
            "Logistic model shows a {quality} fit (R² = {r_squared:.4}); length approaches a carrying capacity of {k:.2} at an assumed rate of {r}."
        ),
    };

    for d in degeneracies {
        text.push_str(" Caution: ");
        text.push_str(d.describe());
        text.push('.');
    }
    text
}
