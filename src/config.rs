//! Modeling configuration.
//!
//! Defaults reproduce the reference behavior exactly. Values can be overridden
//! from the environment (optionally via a `.env` file) and then from CLI flags:
//!
//! - `GROWTH_LOGISTIC_RATE` (logistic `r`, default `0.1`)
//! - `GROWTH_CAPACITY_MULTIPLIER` (logistic `K = max(length) × m`, default `1.2`)
//! - `GROWTH_HORIZON` (future time steps, default `30`)
//! - `GROWTH_ORDER` (`input` or `time`, default `input`)

use serde::{Deserialize, Serialize};

use crate::domain::ObservationOrder;
use crate::error::AppError;

/// Floor applied to lengths before the exponential log-transform.
pub const LOG_FLOOR: f64 = 0.1;

/// Normal quantile for the 95% band.
pub const CONFIDENCE_Z: f64 = 1.96;

pub const DEFAULT_LOGISTIC_RATE: f64 = 0.1;
pub const DEFAULT_CAPACITY_MULTIPLIER: f64 = 1.2;
pub const DEFAULT_HORIZON: usize = 30;

/// Recommendation thresholds.
pub const MIN_RECOMMENDED_SAMPLES: usize = 10;
pub const MIN_RECOMMENDED_TIME_SPAN: f64 = 30.0;
pub const MAX_LENGTH_VARIABILITY: f64 = 0.3;
pub const MIN_ACCEPTABLE_R_SQUARED: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelingConfig {
    /// Logistic growth rate `r`. Not fitted from data.
    pub logistic_rate: f64,
    /// Logistic carrying capacity as a multiple of the largest observed length.
    pub capacity_multiplier: f64,
    /// Number of future integer steps predicted past the last observed time.
    pub horizon: usize,
    pub order: ObservationOrder,
}

impl Default for ModelingConfig {
    fn default() -> Self {
        Self {
            logistic_rate: DEFAULT_LOGISTIC_RATE,
            capacity_multiplier: DEFAULT_CAPACITY_MULTIPLIER,
            horizon: DEFAULT_HORIZON,
            order: ObservationOrder::Input,
        }
    }
}

impl ModelingConfig {
    /// Load `.env` (if any) and apply `GROWTH_*` overrides to the defaults.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(v) = lookup("GROWTH_LOGISTIC_RATE") {
            config.logistic_rate = parse_env("GROWTH_LOGISTIC_RATE", &v)?;
        }
        if let Some(v) = lookup("GROWTH_CAPACITY_MULTIPLIER") {
            config.capacity_multiplier = parse_env("GROWTH_CAPACITY_MULTIPLIER", &v)?;
        }
        if let Some(v) = lookup("GROWTH_HORIZON") {
            config.horizon = parse_env("GROWTH_HORIZON", &v)?;
        }
        if let Some(v) = lookup("GROWTH_ORDER") {
            config.order = match v.trim().to_ascii_lowercase().as_str() {
                "input" => ObservationOrder::Input,
                "time" => ObservationOrder::Time,
                other => {
                    return Err(AppError::new(
                        2,
                        format!("Invalid GROWTH_ORDER '{other}': expected `input` or `time`."),
                    ));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.logistic_rate.is_finite() && self.logistic_rate > 0.0) {
            return Err(AppError::new(2, "Logistic rate must be finite and > 0."));
        }
        if !(self.capacity_multiplier.is_finite() && self.capacity_multiplier > 0.0) {
            return Err(AppError::new(2, "Capacity multiplier must be finite and > 0."));
        }
        if self.horizon == 0 {
            return Err(AppError::new(2, "Prediction horizon must be > 0."));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::new(2, format!("Invalid value for {key}: '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_constants() {
        let config = ModelingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ModelingConfig::default());
        assert_eq!(config.logistic_rate, 0.1);
        assert_eq!(config.capacity_multiplier, 1.2);
        assert_eq!(config.horizon, 30);
        assert_eq!(config.order, ObservationOrder::Input);
    }

    #[test]
    fn env_overrides_apply() {
        let config = ModelingConfig::from_lookup(lookup(&[
            ("GROWTH_LOGISTIC_RATE", "0.25"),
            ("GROWTH_CAPACITY_MULTIPLIER", " 1.5 "),
            ("GROWTH_HORIZON", "10"),
            ("GROWTH_ORDER", "Time"),
        ]))
        .unwrap();
        assert_eq!(config.logistic_rate, 0.25);
        assert_eq!(config.capacity_multiplier, 1.5);
        assert_eq!(config.horizon, 10);
        assert_eq!(config.order, ObservationOrder::Time);
    }

    #[test]
    fn malformed_env_is_rejected() {
        let err = ModelingConfig::from_lookup(lookup(&[("GROWTH_HORIZON", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = ModelingConfig::from_lookup(lookup(&[("GROWTH_LOGISTIC_RATE", "-1")])).unwrap_err();
        assert!(err.to_string().contains("Logistic rate"));
    }
}
