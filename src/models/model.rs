//! Curve evaluation and equation rendering for each growth family.
//!
//! The fitters rely on two primitive operations:
//! - predict `y(t)` from fitted parameters (for residuals, extrapolation and plots)
//! - render the fitted equation as text (for reports)

use crate::domain::GrowthCurve;

/// Evaluate the fitted curve at `t`.
pub fn predict(curve: &GrowthCurve, t: f64) -> f64 {
    match *curve {
        GrowthCurve::Linear { slope, intercept } => slope * t + intercept,
        GrowthCurve::Polynomial { a2, a1, a0 } => a2 * t * t + a1 * t + a0,
        GrowthCurve::Exponential { a, b } => a * (b * t).exp(),
        GrowthCurve::Logistic { k, r, t0, l0 } => {
            let shape = (k - l0) / l0;
            k / (1.0 + shape * (-r * (t - t0)).exp())
        }
    }
}

/// Render the equation string shown in reports.
///
/// Coefficients use 4 decimals, except the quadratic term (6).
pub fn equation(curve: &GrowthCurve) -> String {
    match *curve {
        GrowthCurve::Linear { slope, intercept } => format!("y = {slope:.4}x + {intercept:.4}"),
        GrowthCurve::Polynomial { a2, a1, a0 } => format!("y = {a2:.6}x² + {a1:.4}x + {a0:.4}"),
        GrowthCurve::Exponential { a, b } => format!("y = {a:.4}×e^({b:.4}x)"),
        GrowthCurve::Logistic { k, r, t0, l0 } => {
            let shape = (k - l0) / l0;
            format!("y = {k:.4} / (1 + {shape:.4}×e^(-{r:.4}(x - {t0:.4})))")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_each_family() {
        let lin = GrowthCurve::Linear { slope: 2.0, intercept: 1.0 };
        assert_eq!(predict(&lin, 3.0), 7.0);

        let poly = GrowthCurve::Polynomial { a2: 1.0, a1: -1.0, a0: 2.0 };
        assert_eq!(predict(&poly, 2.0), 4.0);

        let exp = GrowthCurve::Exponential { a: 2.0, b: 0.0 };
        assert_eq!(predict(&exp, 10.0), 2.0);
    }

    #[test]
    fn logistic_passes_through_anchor_and_saturates() {
        let curve = GrowthCurve::Logistic { k: 12.0, r: 0.1, t0: 5.0, l0: 3.0 };
        assert!((predict(&curve, 5.0) - 3.0).abs() < 1e-12);
        assert!((predict(&curve, 500.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn logistic_zero_initial_length_collapses_to_zero() {
        let curve = GrowthCurve::Logistic { k: 12.0, r: 0.1, t0: 0.0, l0: 0.0 };
        assert_eq!(predict(&curve, 10.0), 0.0);
    }

    #[test]
    fn equations_use_fixed_precision() {
        let lin = GrowthCurve::Linear { slope: 2.0, intercept: 0.5 };
        assert_eq!(equation(&lin), "y = 2.0000x + 0.5000");

        let poly = GrowthCurve::Polynomial { a2: 0.001, a1: 1.0, a0: 2.0 };
        assert_eq!(equation(&poly), "y = 0.001000x² + 1.0000x + 2.0000");

        let exp = GrowthCurve::Exponential { a: 1.5, b: 0.02 };
        assert_eq!(equation(&exp), "y = 1.5000×e^(0.0200x)");

        let logistic = GrowthCurve::Logistic { k: 13.2, r: 0.1, t0: 0.0, l0: 2.0 };
        assert_eq!(equation(&logistic), "y = 13.2000 / (1 + 5.6000×e^(-0.1000(x - 0.0000)))");
    }
}
