//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV/HTML
//! - handed to rendering code unchanged

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One length measurement for one species.
///
/// `time_point` is unit-agnostic ("days since start" by convention).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthObservation {
    pub species_name: String,
    pub time_point: f64,
    pub length: f64,
}

impl GrowthObservation {
    pub fn new(species_name: impl Into<String>, time_point: f64, length: f64) -> Self {
        Self {
            species_name: species_name.into(),
            time_point,
            length,
        }
    }
}

/// Candidate model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Linear,
    Polynomial,
    Exponential,
    Logistic,
}

impl ModelKind {
    /// Fixed evaluation order. Selection ties go to the earlier entry.
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Linear,
        ModelKind::Polynomial,
        ModelKind::Exponential,
        ModelKind::Logistic,
    ];

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Linear => "Linear Regression",
            ModelKind::Polynomial => "Polynomial Regression (quadratic)",
            ModelKind::Exponential => "Exponential Growth",
            ModelKind::Logistic => "Logistic Growth",
        }
    }

    /// Short lowercase tag (`linear`, `polynomial`, ...).
    pub fn tag(self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Polynomial => "polynomial",
            ModelKind::Exponential => "exponential",
            ModelKind::Logistic => "logistic",
        }
    }

    /// Parameter count used for the residual degrees of freedom `n - p`.
    ///
    /// The logistic curve is not fitted; it is charged two parameters like
    /// the other two-parameter families.
    pub fn param_count(self) -> usize {
        match self {
            ModelKind::Linear => 2,
            ModelKind::Polynomial => 3,
            ModelKind::Exponential => 2,
            ModelKind::Logistic => 2,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fitted parameters for one model family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum GrowthCurve {
    /// `y = slope·x + intercept`
    Linear { slope: f64, intercept: f64 },
    /// `y = a2·x² + a1·x + a0`
    Polynomial { a2: f64, a1: f64, a0: f64 },
    /// `y = a·e^(b·x)`
    Exponential { a: f64, b: f64 },
    /// `y = k / (1 + ((k - l0) / l0)·e^(-r(x - t0)))`
    Logistic { k: f64, r: f64, t0: f64, l0: f64 },
}

impl GrowthCurve {
    pub fn kind(&self) -> ModelKind {
        match self {
            GrowthCurve::Linear { .. } => ModelKind::Linear,
            GrowthCurve::Polynomial { .. } => ModelKind::Polynomial,
            GrowthCurve::Exponential { .. } => ModelKind::Exponential,
            GrowthCurve::Logistic { .. } => ModelKind::Logistic,
        }
    }
}

/// Normal-approximation 95% band around a point prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// One extrapolated point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub time_point: f64,
    pub predicted_length: f64,
    pub confidence_interval: ConfidenceInterval,
}

/// Numerical edge cases detected while fitting.
///
/// Values are still computed; the flag tells the consumer how far to trust them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// `n - p <= 0`: the residual standard error (and the interval) is undefined.
    ZeroDegreesOfFreedom,
    /// The normal-equations system had a zero pivot.
    SingularSystem,
    /// Logistic `L0` is zero, so `(K - L0) / L0` divides by zero.
    ZeroInitialLength,
    /// All observed lengths are equal, so `SS_tot = 0` and R² is undefined.
    ConstantLength,
}

impl Degeneracy {
    pub fn describe(self) -> &'static str {
        match self {
            Degeneracy::ZeroDegreesOfFreedom => "no residual degrees of freedom; confidence interval undefined",
            Degeneracy::SingularSystem => "normal equations are singular",
            Degeneracy::ZeroInitialLength => "first observed length is zero",
            Degeneracy::ConstantLength => "all observed lengths are equal; R² undefined",
        }
    }
}

/// Output of exactly one candidate fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub equation: String,
    /// Not clamped: negative when the fit is worse than the mean baseline.
    pub r_squared: f64,
    pub curve: GrowthCurve,
    pub predictions: Vec<Prediction>,
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degeneracies: Vec<Degeneracy>,
}

/// Summary statistics of the input series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub sample_size: usize,
    /// `max(time) - min(time)`.
    pub time_span: f64,
    /// `(last length - first length) / time_span`, first/last in modeling order.
    pub growth_rate: f64,
    pub mean_length: f64,
    /// Coefficient of variation of length.
    pub variability: f64,
}

/// Heuristic advice attached to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    CollectMoreSamples,
    ExtendObservationWindow,
    CheckMeasurementConsistency,
    ConsiderOtherFactors,
    CheckEnvironment,
}

impl Recommendation {
    pub fn message(self) -> &'static str {
        match self {
            Recommendation::CollectMoreSamples => {
                "Sample size is small (fewer than 10 points); collect more data points to improve model reliability."
            }
            Recommendation::ExtendObservationWindow => {
                "Observation window is short (under 30 time units); extend the observation period to capture long-term growth."
            }
            Recommendation::CheckMeasurementConsistency => {
                "Length measurements vary widely (CV above 0.3); check measurement consistency."
            }
            Recommendation::ConsiderOtherFactors => {
                "Best model explains under 70% of variance; consider other factors affecting growth such as feeding, water temperature or stocking density."
            }
            Recommendation::CheckEnvironment => {
                "Negative growth trend detected; check environmental conditions and fish health."
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Aggregate output of one modeling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelingReport {
    /// Always four entries, in `ModelKind::ALL` order.
    pub models: Vec<ModelResult>,
    /// Index into `models` of the maximum-R² result.
    pub best_index: usize,
    pub data_quality: DataQuality,
    pub recommendations: Vec<Recommendation>,
}

impl ModelingReport {
    pub fn best_model(&self) -> &ModelResult {
        &self.models[self.best_index]
    }

    pub fn model(&self, kind: ModelKind) -> Option<&ModelResult> {
        self.models.iter().find(|m| m.kind == kind)
    }
}

/// How the modeling order of observations is chosen.
///
/// `growth_rate` and the logistic `t0`/`L0` read the first and last entries,
/// so the order is observable in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ObservationOrder {
    /// Use the observations exactly as supplied.
    #[default]
    Input,
    /// Stable-sort by `time_point` first.
    Time,
}

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ModelKind::Exponential).unwrap();
        assert_eq!(json, "\"exponential\"");
    }

    #[test]
    fn model_result_uses_type_key() {
        let result = ModelResult {
            name: "Linear Regression".to_string(),
            kind: ModelKind::Linear,
            equation: "y = 1.0000x + 0.0000".to_string(),
            r_squared: 1.0,
            curve: GrowthCurve::Linear { slope: 1.0, intercept: 0.0 },
            predictions: vec![],
            analysis: "ok".to_string(),
            degeneracies: vec![],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "linear");
        assert_eq!(value["curve"]["family"], "linear");
        assert!(value.get("degeneracies").is_none());
    }

    #[test]
    fn interval_contains_is_inclusive() {
        let ci = ConfidenceInterval { lower: 1.0, upper: 2.0 };
        assert!(ci.contains(1.0));
        assert!(ci.contains(2.0));
        assert!(!ci.contains(2.5));
    }
}
