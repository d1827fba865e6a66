//! Pointwise log-likelihood functions.
//!
//! Each function scores one simulated cell value against the observed
//! mean and an (inflated) standard deviation. A non-positive or
//! non-finite sigma makes the cell undefined (`NaN`), which the
//! reduction step excludes rather than propagates.

use std::f64::consts::PI;

/// Gaussian log-density of `sim` under `N(mean, sigma^2)`.
///
/// `-0.5 * ((sim - mean) / sigma)^2 - ln(sigma * sqrt(2 * pi))`.
/// Returns `NaN` for `sigma <= 0` or non-finite inputs.
pub fn log_normal(sim: f64, mean: f64, sigma: f64) -> f64 {
    if !(sigma > 0.0) {
        return f64::NAN;
    }
    let r = (sim - mean) / sigma;
    -0.5 * r * r - (sigma * (2.0 * PI).sqrt()).ln()
}

/// Robust pseudo-Huber log-likelihood.
///
/// With `r = (sim - mean) / sigma` and transition scale `delta`:
/// `-delta^2 * (sqrt(1 + (r / delta)^2) - 1) - ln(sigma * sqrt(2 * pi))`.
///
/// Quadratic in `r` near zero (matching [`log_normal`] to second
/// order) and linear for large residuals, so a handful of outlier
/// cells cannot dominate the reduced likelihood the way a squared
/// residual lets them. Returns `NaN` for non-positive `sigma` or
/// `delta`.
pub fn log_pseudo_huber(sim: f64, mean: f64, sigma: f64, delta: f64) -> f64 {
    if !(sigma > 0.0) || !(delta > 0.0) {
        return f64::NAN;
    }
    let r = (sim - mean) / sigma;
    let z = r / delta;
    -(delta * delta) * ((1.0 + z * z).sqrt() - 1.0) - (sigma * (2.0 * PI).sqrt()).ln()
}

/// A pointwise log-likelihood, evaluated per grid cell.
///
/// The sampler is generic over this trait so the likelihood form is a
/// caller decision; [`LogNormal`] and [`LogPseudoHuber`] cover the two
/// supported forms. Implementations must return `NaN` (never a silent
/// default) for cells they cannot score.
pub trait LogLikelihood: Send + Sync {
    /// Log-density of `sim` given the observed `mean` and inflated `sigma`.
    fn log_density(&self, sim: f64, mean: f64, sigma: f64) -> f64;
}

/// The Gaussian likelihood form; see [`log_normal`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNormal;

impl LogLikelihood for LogNormal {
    fn log_density(&self, sim: f64, mean: f64, sigma: f64) -> f64 {
        log_normal(sim, mean, sigma)
    }
}

/// The robust likelihood form; see [`log_pseudo_huber`].
#[derive(Clone, Copy, Debug)]
pub struct LogPseudoHuber {
    /// Transition scale between quadratic and linear behavior, in
    /// units of the inflated sigma.
    pub delta: f64,
}

impl Default for LogPseudoHuber {
    fn default() -> Self {
        Self { delta: 1.0 }
    }
}

impl LogLikelihood for LogPseudoHuber {
    fn log_density(&self, sim: f64, mean: f64, sigma: f64) -> f64 {
        log_pseudo_huber(sim, mean, sigma, self.delta)
    }
}
