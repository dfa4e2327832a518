//! Descriptive statistics and goodness-of-fit helpers.
//!
//! Nothing here clamps or special-cases degenerate inputs: an empty slice gives
//! `NaN` means and a constant series gives an undefined R². Callers flag those
//! cases themselves.

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by `n`).
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Coefficient of variation `std_dev / mean`.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    std_dev(values) / mean(values)
}

/// Residual sum of squares `Σ(y - ŷ)²`.
pub fn sum_squared_residuals(observed: &[f64], fitted: &[f64]) -> f64 {
    observed
        .iter()
        .zip(fitted)
        .map(|(y, f)| (y - f) * (y - f))
        .sum()
}

/// Coefficient of determination `1 - SS_res / SS_tot` against the mean of `observed`.
///
/// May be negative for anti-fits.
pub fn r_squared(observed: &[f64], fitted: &[f64]) -> f64 {
    let m = mean(observed);
    let ss_tot: f64 = observed.iter().map(|y| (y - m) * (y - m)).sum();
    let ss_res = sum_squared_residuals(observed, fitted);
    1.0 - ss_res / ss_tot
}

/// Residual standard error `sqrt(SS_res / (n - params))`.
///
/// Returns `+∞` when there are no residual degrees of freedom.
pub fn residual_standard_error(ss_res: f64, n: usize, params: usize) -> f64 {
    if n <= params {
        return f64::INFINITY;
    }
    (ss_res / (n - params) as f64).sqrt()
}
