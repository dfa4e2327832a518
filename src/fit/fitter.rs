//! Low-level fitting routines for a single model family.
//!
//! Given observations `(t_i, y_i)` each fitter:
//! - estimates the family's parameters
//! - computes R² on the original length scale
//! - extrapolates `horizon` future steps with a `±1.96·SE` band
//!
//! and returns one `ModelResult`.
//!
//! Numerical edge cases are flagged on the result (`Degeneracy`) rather than
//! hidden. The only hard errors are fewer than 2 observations and identical
//! time points (the least-squares line is undefined).

use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::config::{CONFIDENCE_Z, LOG_FLOOR, ModelingConfig};
use crate::domain::{
    ConfidenceInterval, Degeneracy, GrowthCurve, GrowthObservation, ModelKind, ModelResult, Prediction,
};
use crate::error::{ModelingError, Result};
use crate::fit::analysis::describe_fit;
use crate::math::{r_squared, residual_standard_error, solve, sum_squared_residuals};
use crate::models::{equation, predict};

/// Fewest observations any single fitter accepts.
pub const MIN_FIT_POINTS: usize = 2;

/// Run the fitter for `kind`.
pub fn fit_model(kind: ModelKind, observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelResult> {
    match kind {
        ModelKind::Linear => fit_linear(observations, config),
        ModelKind::Polynomial => fit_polynomial(observations, config),
        ModelKind::Exponential => fit_exponential(observations, config),
        ModelKind::Logistic => fit_logistic(observations, config),
    }
}

/// Ordinary least squares line `y = slope·x + intercept`.
pub fn fit_linear(observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelResult> {
    let (xs, ys) = split_xy(observations)?;
    let (slope, intercept) = least_squares_line(&xs, &ys)?;
    let curve = GrowthCurve::Linear { slope, intercept };
    Ok(finish(curve, &xs, &ys, config, Vec::new()))
}

/// Quadratic least squares via the 3×3 normal equations.
pub fn fit_polynomial(observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelResult> {
    let (xs, ys) = split_xy(observations)?;

    let mut s = [0.0_f64; 5]; // Σx^0 .. Σx^4
    let mut sy = [0.0_f64; 3]; // Σy, Σxy, Σx²y
    for (&x, &y) in xs.iter().zip(&ys) {
        let mut p = 1.0;
        for (k, acc) in s.iter_mut().enumerate() {
            *acc += p;
            if k < 3 {
                sy[k] += p * y;
            }
            p *= x;
        }
    }

    #[rustfmt::skip]
    let augmented = DMatrix::from_row_slice(3, 4, &[
        s[0], s[1], s[2], sy[0],
        s[1], s[2], s[3], sy[1],
        s[2], s[3], s[4], sy[2],
    ]);

    let mut degeneracies = Vec::new();
    let curve = match solve(augmented) {
        Ok(coef) => GrowthCurve::Polynomial {
            a2: coef[2],
            a1: coef[1],
            a0: coef[0],
        },
        Err(ModelingError::SingularMatrix { column }) => {
            warn!(column, "polynomial normal equations are singular");
            degeneracies.push(Degeneracy::SingularSystem);
            GrowthCurve::Polynomial {
                a2: f64::NAN,
                a1: f64::NAN,
                a0: f64::NAN,
            }
        }
        Err(e) => return Err(e),
    };

    Ok(finish(curve, &xs, &ys, config, degeneracies))
}

/// Exponential `y = a·e^(b·x)` fitted as a line on `ln(max(y, 0.1))`.
///
/// R² and the standard error are computed on the original scale.
pub fn fit_exponential(observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelResult> {
    let (xs, ys) = split_xy(observations)?;
    let log_ys: Vec<f64> = ys.iter().map(|&y| y.max(LOG_FLOOR).ln()).collect();
    let (b, ln_a) = least_squares_line(&xs, &log_ys)?;
    let curve = GrowthCurve::Exponential { a: ln_a.exp(), b };
    Ok(finish(curve, &xs, &ys, config, Vec::new()))
}

/// Heuristic logistic curve. Not an optimized fit.
///
/// `K = max(length) × capacity_multiplier`, `r = logistic_rate`, and the curve
/// is anchored at the first observation in the order given.
pub fn fit_logistic(observations: &[GrowthObservation], config: &ModelingConfig) -> Result<ModelResult> {
    let (xs, ys) = split_xy(observations)?;

    let max_length = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let k = max_length * config.capacity_multiplier;
    let t0 = xs[0];
    let l0 = ys[0];

    let mut degeneracies = Vec::new();
    if l0 == 0.0 {
        warn!("logistic anchor length is zero");
        degeneracies.push(Degeneracy::ZeroInitialLength);
    }

    let curve = GrowthCurve::Logistic {
        k,
        r: config.logistic_rate,
        t0,
        l0,
    };
    Ok(finish(curve, &xs, &ys, config, degeneracies))
}

/// Build the extrapolated predictions for `t = max_time + 1 ..= max_time + horizon`.
///
/// The band is centered on the point estimate *after* it is clamped at zero,
/// so `lower <= predicted <= upper` always holds; the lower bound is clamped too.
pub fn build_predictions(curve: &GrowthCurve, max_time: f64, standard_error: f64, horizon: usize) -> Vec<Prediction> {
    let half_width = CONFIDENCE_Z * standard_error;
    (1..=horizon)
        .map(|i| {
            let t = max_time + i as f64;
            let predicted = clamp_non_negative(predict(curve, t));
            Prediction {
                time_point: t,
                predicted_length: predicted,
                confidence_interval: ConfidenceInterval {
                    lower: clamp_non_negative(predicted - half_width),
                    upper: predicted + half_width,
                },
            }
        })
        .collect()
}

fn finish(
    curve: GrowthCurve,
    xs: &[f64],
    ys: &[f64],
    config: &ModelingConfig,
    mut degeneracies: Vec<Degeneracy>,
) -> ModelResult {
    let kind = curve.kind();
    let n = xs.len();

    let fitted: Vec<f64> = xs.iter().map(|&x| predict(&curve, x)).collect();
    let r2 = r_squared(ys, &fitted);
    let ss_res = sum_squared_residuals(ys, &fitted);
    let se = residual_standard_error(ss_res, n, kind.param_count());

    if n <= kind.param_count() {
        degeneracies.push(Degeneracy::ZeroDegreesOfFreedom);
    }
    if ys.iter().all(|&y| y == ys[0]) {
        degeneracies.push(Degeneracy::ConstantLength);
    }

    let max_time = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let predictions = build_predictions(&curve, max_time, se, config.horizon);

    debug!(model = %kind, r_squared = r2, standard_error = se, n, "fitted model");

    let analysis = describe_fit(&curve, r2, &degeneracies);
    ModelResult {
        name: kind.display_name().to_string(),
        kind,
        equation: equation(&curve),
        r_squared: r2,
        curve,
        predictions,
        analysis,
        degeneracies,
    }
}

/// Closed-form simple regression. Errors when every `x` is identical.
fn least_squares_line(xs: &[f64], ys: &[f64]) -> Result<(f64, f64)> {
    let n = xs.len() as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }

    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return Err(ModelingError::DegenerateInput(
            "all time points are identical; slope is undefined".to_string(),
        ));
    }

    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    Ok((slope, intercept))
}

fn split_xy(observations: &[GrowthObservation]) -> Result<(Vec<f64>, Vec<f64>)> {
    if observations.len() < MIN_FIT_POINTS {
        return Err(ModelingError::InsufficientData {
            required: MIN_FIT_POINTS,
            got: observations.len(),
        });
    }
    Ok(observations.iter().map(|o| (o.time_point, o.length)).unzip())
}

/// `max(0, v)` that keeps `NaN` visible.
fn clamp_non_negative(v: f64) -> f64 {
    if v < 0.0 { 0.0 } else { v }
}
