//! Shared "fit pipeline" logic.
//!
//! One species in, one report out. Several species are independent and run in
//! parallel: each gets its own observation slice and nothing is shared.

use rayon::prelude::*;

use crate::config::ModelingConfig;
use crate::domain::{GrowthObservation, ModelingReport};
use crate::error::ModelingError;
use crate::fit::build_report;

/// All computed outputs for one species.
#[derive(Debug, Clone)]
pub struct SpeciesRun {
    pub species: String,
    pub observations: Vec<GrowthObservation>,
    pub report: ModelingReport,
}

/// Model a single species.
pub fn run_species(
    species: &str,
    observations: Vec<GrowthObservation>,
    config: &ModelingConfig,
) -> Result<SpeciesRun, ModelingError> {
    let report = build_report(&observations, config)?;
    Ok(SpeciesRun {
        species: species.to_string(),
        observations,
        report,
    })
}

/// Model every group. Output order matches input order.
pub fn run_all(
    groups: Vec<(String, Vec<GrowthObservation>)>,
    config: &ModelingConfig,
) -> Vec<(String, Result<SpeciesRun, ModelingError>)> {
    groups
        .into_par_iter()
        .map(|(species, observations)| {
            let result = run_species(&species, observations, config);
            (species, result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_all_keeps_order_and_isolates_failures() {
        let good: Vec<GrowthObservation> = (0..5)
            .map(|i| GrowthObservation::new("salmon", i as f64 * 10.0, 3.0 + i as f64))
            .collect();
        let short = vec![GrowthObservation::new("trout", 0.0, 1.0)];

        let results = run_all(
            vec![
                ("salmon".to_string(), good),
                ("trout".to_string(), short),
                ("salmon-2".to_string(), vec![]),
            ],
            &ModelingConfig::default(),
        );

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "salmon");
        assert!(results[0].1.is_ok());
        assert_eq!(
            results[1].1.as_ref().unwrap_err(),
            &ModelingError::InsufficientData { required: 3, got: 1 }
        );
        assert!(results[2].1.is_err());
    }
}
