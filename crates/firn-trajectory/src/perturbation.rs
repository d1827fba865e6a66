//! Deterministic perturbation of a velocity uncertainty envelope.

use firn_core::PerturbationSample;
use firn_grid::{Grid2, VelocityField};

use crate::error::TrajectoryError;

/// Build one perturbed realization of a velocity field.
///
/// Per component, the uncertainty envelope is `[mean - sigma * err,
/// mean + sigma * err]` and the sample fraction interpolates linearly
/// across it: `sample = (0, 0)` reproduces the lower bound, `(1, 1)`
/// the upper bound, and `(0.5, 0.5)` the mean. This is a deterministic
/// deformation of the envelope: sweeping a grid of samples yields a
/// reproducible sensitivity study. Missing cells in either input stay
/// missing in the result.
///
/// # Errors
///
/// Returns [`TrajectoryError::InvalidSigma`] for a non-positive or
/// non-finite `sigma`, [`TrajectoryError::AxisMismatch`] when the mean
/// and error fields are on different axes, and a grid error if their
/// shapes disagree.
pub fn perturbed_velocities(
    mean: &VelocityField,
    error: &VelocityField,
    sample: PerturbationSample,
    sigma: f64,
) -> Result<VelocityField, TrajectoryError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(TrajectoryError::InvalidSigma { value: sigma });
    }
    if mean.x_axis() != error.x_axis() || mean.y_axis() != error.y_axis() {
        return Err(TrajectoryError::AxisMismatch);
    }

    let blend = |s: f64| {
        move |m: f64, e: f64| {
            let lo = m - sigma * e;
            let hi = m + sigma * e;
            lo + s * (hi - lo)
        }
    };
    let vx = mean.vx().zip_with(error.vx(), blend(sample.sx()))?;
    let vy = mean.vy().zip_with(error.vy(), blend(sample.sy()))?;

    Ok(VelocityField::new(
        mean.x_axis().clone(),
        mean.y_axis().clone(),
        vx,
        vy,
    )?)
}

/// A source of perturbed velocity fields, one per perturbation sample.
///
/// This is the seam between the sweep machinery and the way a
/// perturbed field is obtained: from a mean/error envelope, from
/// precomputed bounds, or from anything else a caller supplies.
/// Implementations must be shareable across sweep workers, so the
/// backing grids are read-only.
pub trait VelocityProvider: Send + Sync {
    /// Materialize the perturbed field for one sample.
    ///
    /// # Errors
    ///
    /// Implementations report structurally invalid inputs; they must
    /// not silently substitute a default field.
    fn velocity_field(&self, sample: PerturbationSample)
        -> Result<VelocityField, TrajectoryError>;
}

/// Provider deforming a mean/error uncertainty envelope.
///
/// Holds the mean velocity field, the per-component error field on the
/// same axes, and the sigma multiplier scaling the envelope half-width.
#[derive(Clone, Debug)]
pub struct EnvelopeProvider {
    mean: VelocityField,
    error: VelocityField,
    sigma: f64,
}

impl EnvelopeProvider {
    /// Construct the provider, validating sigma and field consistency.
    ///
    /// # Errors
    ///
    /// Same conditions as [`perturbed_velocities`].
    pub fn new(
        mean: VelocityField,
        error: VelocityField,
        sigma: f64,
    ) -> Result<Self, TrajectoryError> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(TrajectoryError::InvalidSigma { value: sigma });
        }
        if mean.x_axis() != error.x_axis() || mean.y_axis() != error.y_axis() {
            return Err(TrajectoryError::AxisMismatch);
        }
        Ok(Self { mean, error, sigma })
    }
}

impl VelocityProvider for EnvelopeProvider {
    fn velocity_field(
        &self,
        sample: PerturbationSample,
    ) -> Result<VelocityField, TrajectoryError> {
        perturbed_velocities(&self.mean, &self.error, sample, self.sigma)
    }
}

/// Provider interpolating between precomputed envelope bounds.
///
/// Useful when the min/max fields were already materialized once and
/// many samples will be swept: each draw is then a single blend
/// instead of recomputing the envelope from mean and error.
#[derive(Clone, Debug)]
pub struct PrecomputedEnvelope {
    min: VelocityField,
    max: VelocityField,
}

impl PrecomputedEnvelope {
    /// Construct the provider from lower and upper envelope fields.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::AxisMismatch`] when the bounds are on
    /// different axes.
    pub fn new(min: VelocityField, max: VelocityField) -> Result<Self, TrajectoryError> {
        if min.x_axis() != max.x_axis() || min.y_axis() != max.y_axis() {
            return Err(TrajectoryError::AxisMismatch);
        }
        Ok(Self { min, max })
    }
}

impl VelocityProvider for PrecomputedEnvelope {
    fn velocity_field(
        &self,
        sample: PerturbationSample,
    ) -> Result<VelocityField, TrajectoryError> {
        let blend = |s: f64| move |lo: f64, hi: f64| lo + s * (hi - lo);
        let vx = self.min.vx().zip_with(self.max.vx(), blend(sample.sx()))?;
        let vy = self.min.vy().zip_with(self.max.vy(), blend(sample.sy()))?;
        Ok(VelocityField::new(
            self.min.x_axis().clone(),
            self.min.y_axis().clone(),
            vx,
            vy,
        )?)
    }
}
