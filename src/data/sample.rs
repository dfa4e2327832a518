//! Synthetic growth samples.
//!
//! Generates a logistic-shaped length series with multiplicative log-normal
//! noise, so the tool can be exercised without an uploaded file. Output is
//! deterministic for a given `(species, seed, ...)` combination.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::GrowthObservation;
use crate::error::AppError;

/// Parameters of the synthetic series.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub species: String,
    pub count: usize,
    /// Spacing between consecutive time points.
    pub interval: f64,
    pub seed: u64,
    /// Length at `t = 0`.
    pub initial_length: f64,
    /// Asymptotic length.
    pub asymptotic_length: f64,
    /// Intrinsic growth rate per time unit.
    pub growth_rate: f64,
    /// Log-scale noise standard deviation.
    pub noise: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            species: "Atlantic salmon".to_string(),
            count: 20,
            interval: 7.0,
            seed: 42,
            initial_length: 5.0,
            asymptotic_length: 60.0,
            growth_rate: 0.03,
            noise: 0.05,
        }
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<GrowthObservation>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if !(config.interval.is_finite() && config.interval > 0.0) {
        return Err(AppError::new(2, "Sample interval must be finite and > 0."));
    }
    if !(config.initial_length > 0.0 && config.asymptotic_length > config.initial_length) {
        return Err(AppError::new(2, "Invalid length range: need 0 < initial < asymptotic."));
    }
    if !(config.noise.is_finite() && config.noise >= 0.0) {
        return Err(AppError::new(2, "Noise must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(sample_seed(config));
    let normal = Normal::new(0.0, 1.0).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let shape = (config.asymptotic_length - config.initial_length) / config.initial_length;
    let sigma = config.noise;

    let points = (0..config.count)
        .map(|i| {
            let t = i as f64 * config.interval;
            let base = config.asymptotic_length / (1.0 + shape * (-config.growth_rate * t).exp());
            // Mean-corrected so E[length] stays on the curve.
            let z: f64 = normal.sample(&mut rng);
            let length = base * (sigma * z - 0.5 * sigma * sigma).exp();
            GrowthObservation::new(config.species.clone(), t, round_to(length, 2))
        })
        .collect();

    Ok(points)
}

fn sample_seed(config: &SampleConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.species.hash(&mut hasher);
    config.seed.hash(&mut hasher);
    config.count.hash(&mut hasher);
    config.interval.to_bits().hash(&mut hasher);
    hasher.finish()
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
