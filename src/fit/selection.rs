//! Report construction: fit every family, pick the best by R², summarize the data.
//!
//! Selection rules:
//! 1. Require at least 3 observations and a non-zero time span
//! 2. Fit linear → polynomial → exponential → logistic, in that order
//! 3. Best model = maximum R²; a later model must be strictly better to win,
//!    so ties go to the earlier family
//! 4. Five independent heuristics produce the recommendations

use std::borrow::Cow;

use tracing::info;

use crate::config::{
    MAX_LENGTH_VARIABILITY, MIN_ACCEPTABLE_R_SQUARED, MIN_RECOMMENDED_SAMPLES, MIN_RECOMMENDED_TIME_SPAN,
    ModelingConfig,
};
use crate::domain::{
    DataQuality, GrowthObservation, ModelKind, ModelResult, ModelingReport, ObservationOrder, Recommendation,
};
use crate::error::{MIN_REPORT_POINTS, ModelingError, Result};
use crate::fit::fitter::fit_model;
use crate::math::{coefficient_of_variation, mean};

/// Fit all four families and assemble the report.
pub fn build_report(observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelingReport> {
    if observations.len() < MIN_REPORT_POINTS {
        return Err(ModelingError::InsufficientData {
            required: MIN_REPORT_POINTS,
            got: observations.len(),
        });
    }
    ensure_finite(observations)?;

    let ordered = order_observations(observations, config.order);
    let data_quality = assess_data_quality(&ordered);
    if data_quality.time_span == 0.0 {
        return Err(ModelingError::DegenerateInput(
            "all time points are identical; time span is zero".to_string(),
        ));
    }

    let models = ModelKind::ALL
        .iter()
        .map(|&kind| fit_model(kind, &ordered, config))
        .collect::<Result<Vec<_>>>()?;

    let best_index = select_best(&models);
    let recommendations = recommend(&data_quality, models[best_index].r_squared);

    info!(
        species = %ordered[0].species_name,
        n = data_quality.sample_size,
        best = %models[best_index].kind,
        r_squared = models[best_index].r_squared,
        "built modeling report"
    );

    Ok(ModelingReport {
        models,
        best_index,
        data_quality,
        recommendations,
    })
}

/// Index of the maximum-R² model; first wins on ties.
///
/// `NaN` never compares greater, so an undefined fit only wins if it is first
/// and nothing beats it.
pub fn select_best(models: &[ModelResult]) -> usize {
    let mut best = 0;
    for (i, m) in models.iter().enumerate().skip(1) {
        if m.r_squared > models[best].r_squared {
            best = i;
        }
    }
    best
}

/// Apply the configured ordering. `Input` borrows, `Time` sorts a copy (stable).
pub fn order_observations(observations: &[GrowthObservation], order: ObservationOrder) -> Cow<'_, [GrowthObservation]> {
    match order {
        ObservationOrder::Input => Cow::Borrowed(observations),
        ObservationOrder::Time => {
            let mut sorted = observations.to_vec();
            sorted.sort_by(|a, b| a.time_point.total_cmp(&b.time_point));
            Cow::Owned(sorted)
        }
    }
}

/// Summary statistics. `growth_rate` uses the first and last entries as given.
pub fn assess_data_quality(observations: &[GrowthObservation]) -> DataQuality {
    let lengths: Vec<f64> = observations.iter().map(|o| o.length).collect();
    let (t_min, t_max) = observations
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| {
            (lo.min(o.time_point), hi.max(o.time_point))
        });
    let time_span = t_max - t_min;

    let growth_rate = match (observations.first(), observations.last()) {
        (Some(first), Some(last)) => (last.length - first.length) / time_span,
        _ => f64::NAN,
    };

    DataQuality {
        sample_size: observations.len(),
        time_span,
        growth_rate,
        mean_length: mean(&lengths),
        variability: coefficient_of_variation(&lengths),
    }
}

/// Evaluate the five recommendation rules independently, in fixed order.
pub fn recommend(quality: &DataQuality, best_r_squared: f64) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if quality.sample_size < MIN_RECOMMENDED_SAMPLES {
        out.push(Recommendation::CollectMoreSamples);
    }
    if quality.time_span < MIN_RECOMMENDED_TIME_SPAN {
        out.push(Recommendation::ExtendObservationWindow);
    }
    if quality.variability > MAX_LENGTH_VARIABILITY {
        out.push(Recommendation::CheckMeasurementConsistency);
    }
    if best_r_squared < MIN_ACCEPTABLE_R_SQUARED {
        out.push(Recommendation::ConsiderOtherFactors);
    }
    if quality.growth_rate < 0.0 {
        out.push(Recommendation::CheckEnvironment);
    }
    out
}

fn ensure_finite(observations: &[GrowthObservation]) -> Result<()> {
    for o in observations {
        if !o.time_point.is_finite() {
            return Err(ModelingError::NonFinite { field: "time_point" });
        }
        if !o.length.is_finite() {
            return Err(ModelingError::NonFinite { field: "length" });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Degeneracy, GrowthCurve};
    use proptest::prelude::*;

    fn obs(points: &[(f64, f64)]) -> Vec<GrowthObservation> {
        points
            .iter()
            .map(|&(t, l)| GrowthObservation::new("grouper", t, l))
            .collect()
    }

    fn stub_model(kind: ModelKind, r_squared: f64) -> ModelResult {
        ModelResult {
            name: kind.display_name().to_string(),
            kind,
            equation: String::new(),
            r_squared,
            curve: GrowthCurve::Linear { slope: 0.0, intercept: 0.0 },
            predictions: vec![],
            analysis: "stub".to_string(),
            degeneracies: vec![],
        }
    }

    #[test]
    fn rejects_fewer_than_three_points() {
        let config = ModelingConfig::default();
        for n in 0..3 {
            let data: Vec<GrowthObservation> = (0..n)
                .map(|i| GrowthObservation::new("cod", i as f64, 1.0 + i as f64))
                .collect();
            let err = build_report(&data, &config).unwrap_err();
            assert_eq!(err, ModelingError::InsufficientData { required: 3, got: n });
        }

        let data = obs(&[(0.0, 1.0), (10.0, 2.0), (20.0, 4.0)]);
        assert!(build_report(&data, &config).is_ok());
    }

    #[test]
    fn rejects_identical_time_points() {
        let data = obs(&[(7.0, 1.0), (7.0, 2.0), (7.0, 3.0)]);
        let err = build_report(&data, &ModelingConfig::default()).unwrap_err();
        assert!(matches!(err, ModelingError::DegenerateInput(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let data = obs(&[(0.0, 1.0), (1.0, f64::NAN), (2.0, 3.0)]);
        let err = build_report(&data, &ModelingConfig::default()).unwrap_err();
        assert_eq!(err, ModelingError::NonFinite { field: "length" });
    }

    #[test]
    fn report_has_four_models_in_fixed_order() {
        let data = obs(&[(0.0, 5.0), (10.0, 9.0), (20.0, 14.0), (30.0, 18.0), (40.0, 21.0)]);
        let report = build_report(&data, &ModelingConfig::default()).unwrap();

        let kinds: Vec<ModelKind> = report.models.iter().map(|m| m.kind).collect();
        assert_eq!(kinds, ModelKind::ALL.to_vec());
        assert!(report.models.iter().all(|m| m.predictions.len() == 30));
        assert!(report.models.iter().all(|m| !m.analysis.is_empty()));
    }

    #[test]
    fn three_point_report_prefers_exact_quadratic() {
        let data = obs(&[(0.0, 1.0), (10.0, 3.0), (20.0, 8.0)]);
        let report = build_report(&data, &ModelingConfig::default()).unwrap();
        assert_eq!(report.best_model().kind, ModelKind::Polynomial);
        assert!((report.best_model().r_squared - 1.0).abs() < 1e-9);
        assert!(report.best_model().degeneracies.contains(&Degeneracy::ZeroDegreesOfFreedom));
    }

    #[test]
    fn ties_go_to_the_earlier_model() {
        let models = vec![
            stub_model(ModelKind::Linear, 0.9),
            stub_model(ModelKind::Polynomial, 0.9),
            stub_model(ModelKind::Exponential, 0.5),
            stub_model(ModelKind::Logistic, 0.9),
        ];
        assert_eq!(select_best(&models), 0);

        let models = vec![
            stub_model(ModelKind::Linear, 0.4),
            stub_model(ModelKind::Polynomial, f64::NAN),
            stub_model(ModelKind::Exponential, 0.8),
            stub_model(ModelKind::Logistic, 0.8),
        ];
        assert_eq!(select_best(&models), 2);
    }

    #[test]
    fn collinear_data_selects_linear() {
        // Linear and quadratic both fit exactly; the earlier family wins unless
        // rounding makes the quadratic strictly better.
        let data = obs(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)]);
        let report = build_report(&data, &ModelingConfig::default()).unwrap();
        let linear = report.model(ModelKind::Linear).unwrap();
        assert!((linear.r_squared - 1.0).abs() < 1e-9);
        assert!(report.best_model().r_squared >= linear.r_squared);
    }

    #[test]
    fn growth_rate_depends_on_input_order() {
        let data = obs(&[(30.0, 12.0), (0.0, 3.0), (10.0, 6.0), (20.0, 9.0)]);

        let as_given = build_report(&data, &ModelingConfig::default()).unwrap();
        // (last - first) / span = (9 - 12) / 30
        assert!((as_given.data_quality.growth_rate - (-0.1)).abs() < 1e-12);
        assert!(as_given.recommendations.contains(&Recommendation::CheckEnvironment));

        let config = ModelingConfig {
            order: ObservationOrder::Time,
            ..ModelingConfig::default()
        };
        let sorted = build_report(&data, &config).unwrap();
        assert!((sorted.data_quality.growth_rate - 0.3).abs() < 1e-12);
        assert!(!sorted.recommendations.contains(&Recommendation::CheckEnvironment));
    }

    #[test]
    fn data_quality_fields() {
        let data = obs(&[(0.0, 2.0), (10.0, 4.0), (20.0, 6.0)]);
        let q = assess_data_quality(&data);
        assert_eq!(q.sample_size, 3);
        assert_eq!(q.time_span, 20.0);
        assert!((q.growth_rate - 0.2).abs() < 1e-12);
        assert!((q.mean_length - 4.0).abs() < 1e-12);
        let expected_cv = (8.0_f64 / 3.0).sqrt() / 4.0;
        assert!((q.variability - expected_cv).abs() < 1e-12);
    }

    fn quality(sample_size: usize, time_span: f64, variability: f64, growth_rate: f64) -> DataQuality {
        DataQuality {
            sample_size,
            time_span,
            growth_rate,
            mean_length: 10.0,
            variability,
        }
    }

    #[test]
    fn recommendation_boundaries() {
        // Every rule exactly at its threshold: nothing fires.
        let q = quality(10, 30.0, 0.3, 0.0);
        assert!(recommend(&q, 0.7).is_empty());

        let q = quality(9, 29.9, 0.31, -0.01);
        assert_eq!(
            recommend(&q, 0.69),
            vec![
                Recommendation::CollectMoreSamples,
                Recommendation::ExtendObservationWindow,
                Recommendation::CheckMeasurementConsistency,
                Recommendation::ConsiderOtherFactors,
                Recommendation::CheckEnvironment,
            ]
        );
    }

    #[test]
    fn recommendation_rules_are_independent() {
        let q = quality(50, 10.0, 0.1, 0.5);
        assert_eq!(recommend(&q, 0.95), vec![Recommendation::ExtendObservationWindow]);

        let q = quality(50, 100.0, 0.1, 0.5);
        assert_eq!(recommend(&q, 0.2), vec![Recommendation::ConsiderOtherFactors]);
    }

    #[test]
    fn report_thresholds_on_real_data() {
        // 11 points, span exactly 30, length = 10 + 0.5t: CV = 0.5·σ(t)/17.5 ≈ 0.271.
        let steady: Vec<GrowthObservation> = (0..=10)
            .map(|i| {
                let t = i as f64 * 3.0;
                GrowthObservation::new("grouper", t, 10.0 + 0.5 * t)
            })
            .collect();
        let report = build_report(&steady, &ModelingConfig::default()).unwrap();
        let q = &report.data_quality;
        assert_eq!(q.time_span, 30.0);
        assert!((q.variability - 0.5 * 90.0_f64.sqrt() / 17.5).abs() < 1e-12);
        assert!(report.recommendations.is_empty());

        // Same span, wider spread: CV ≈ 0.474 crosses the consistency threshold only.
        let spread: Vec<GrowthObservation> = (0..=10)
            .map(|i| {
                let t = i as f64 * 3.0;
                GrowthObservation::new("grouper", t, 5.0 + t)
            })
            .collect();
        let report = build_report(&spread, &ModelingConfig::default()).unwrap();
        assert_eq!(report.recommendations, vec![Recommendation::CheckMeasurementConsistency]);

        // Just short of the window.
        let short: Vec<GrowthObservation> = (0..=10)
            .map(|i| {
                let t = i as f64 * 2.9;
                GrowthObservation::new("grouper", t, 10.0 + 0.5 * t)
            })
            .collect();
        let report = build_report(&short, &ModelingConfig::default()).unwrap();
        assert_eq!(report.recommendations, vec![Recommendation::ExtendObservationWindow]);
    }

    #[test]
    fn sample_size_message_in_report() {
        let small = obs(&[(0.0, 5.0), (15.0, 6.0), (30.0, 7.0), (45.0, 8.0)]);
        let report = build_report(&small, &ModelingConfig::default()).unwrap();
        assert!(report.recommendations.contains(&Recommendation::CollectMoreSamples));

        let large: Vec<GrowthObservation> = (0..10)
            .map(|i| GrowthObservation::new("grouper", i as f64 * 5.0, 5.0 + i as f64 * 0.2))
            .collect();
        let report = build_report(&large, &ModelingConfig::default()).unwrap();
        assert!(!report.recommendations.contains(&Recommendation::CollectMoreSamples));
    }

    proptest! {
        #[test]
        fn report_invariants_hold(
            points in prop::collection::vec((0.0f64..200.0, 0.5f64..80.0), 3..25)
        ) {
            let first_t = points[0].0;
            prop_assume!(points.iter().any(|&(t, _)| (t - first_t).abs() > 1e-3));

            let data = obs(&points);
            let report = build_report(&data, &ModelingConfig::default()).unwrap();

            prop_assert_eq!(report.models.len(), 4);
            prop_assert!(report.best_index < 4);
            let best = report.best_model();
            for m in &report.models {
                prop_assert_eq!(m.predictions.len(), 30);
                prop_assert!(!(m.r_squared > best.r_squared));
                for p in &m.predictions {
                    let ci = p.confidence_interval;
                    if ci.is_finite() && p.predicted_length.is_finite() {
                        prop_assert!(ci.contains(p.predicted_length));
                    }
                }
            }
        }
    }
}
