//! The importance sampler: weight evaluation and multinomial resampling.

use firn_core::MemberId;
use firn_grid::Grid2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::SampleError;
use crate::likelihood::{LogLikelihood, LogNormal};

/// Bayesian-style importance sampler over a simulation ensemble.
///
/// Construction validates every input (grid shapes, fudge factor,
/// sample count) so the numerical methods can assume well-formed data.
/// The sampler itself is pure: [`weights`](ImportanceSampler::weights)
/// is a deterministic function of the inputs, and
/// [`resample`](ImportanceSampler::resample) is deterministic once a
/// seed is fixed.
///
/// # Construction
///
/// ```
/// use firn_core::MemberId;
/// use firn_grid::Grid2;
/// use firn_sampling::ImportanceSampler;
///
/// let sampler = ImportanceSampler::builder()
///     .observed_mean(Grid2::filled(2, 2, 100.0))
///     .observed_std(Grid2::filled(2, 2, 10.0))
///     .member(MemberId(0), Grid2::filled(2, 2, 98.0))
///     .member(MemberId(1), Grid2::filled(2, 2, 250.0))
///     .fudge_factor(3.0)
///     .n_samples(100)
///     .seed(42)
///     .build()
///     .unwrap();
/// let ids = sampler.resample().unwrap();
/// assert_eq!(ids.len(), 100);
/// ```
pub struct ImportanceSampler {
    observed_mean: Grid2,
    observed_std: Grid2,
    members: Vec<(MemberId, Grid2)>,
    likelihood: Box<dyn LogLikelihood>,
    fudge_factor: f64,
    n_samples: usize,
    seed: Option<u64>,
}

impl std::fmt::Debug for ImportanceSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportanceSampler")
            .field("observed_mean", &self.observed_mean)
            .field("observed_std", &self.observed_std)
            .field("members", &self.members)
            .field("likelihood", &"<dyn LogLikelihood>")
            .field("fudge_factor", &self.fudge_factor)
            .field("n_samples", &self.n_samples)
            .field("seed", &self.seed)
            .finish()
    }
}

/// Builder for [`ImportanceSampler`].
///
/// Required inputs: `observed_mean`, `observed_std`, and at least one
/// `member`. The likelihood defaults to [`LogNormal`], the fudge
/// factor to `1.0`, and the sample count to the ensemble size.
pub struct ImportanceSamplerBuilder {
    observed_mean: Option<Grid2>,
    observed_std: Option<Grid2>,
    members: Vec<(MemberId, Grid2)>,
    likelihood: Box<dyn LogLikelihood>,
    fudge_factor: f64,
    n_samples: Option<usize>,
    seed: Option<u64>,
}

impl ImportanceSampler {
    /// Create a new builder.
    pub fn builder() -> ImportanceSamplerBuilder {
        ImportanceSamplerBuilder {
            observed_mean: None,
            observed_std: None,
            members: Vec::new(),
            likelihood: Box::new(LogNormal),
            fudge_factor: 1.0,
            n_samples: None,
            seed: None,
        }
    }

    /// The registered member ids, in ensemble order.
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.members.iter().map(|(id, _)| *id).collect()
    }

    /// Reduced log-likelihood per member.
    ///
    /// Each member's per-cell log-likelihood is summed over every grid
    /// cell with a defined value; undefined cells (NaN observation,
    /// NaN simulation, non-positive sigma) are excluded from the sum
    /// rather than propagated. A member with no defined cell at all
    /// reduces to `NaN`.
    pub fn log_likelihoods(&self) -> Vec<f64> {
        let mean = self.observed_mean.data();
        let std = self.observed_std.data();
        self.members
            .iter()
            .map(|(_, sim)| {
                let mut total = 0.0;
                let mut valid = 0usize;
                for (i, &s) in sim.data().iter().enumerate() {
                    let ll = self
                        .likelihood
                        .log_density(s, mean[i], self.fudge_factor * std[i]);
                    if !ll.is_nan() {
                        total += ll;
                        valid += 1;
                    }
                }
                if valid == 0 {
                    f64::NAN
                } else {
                    total
                }
            })
            .collect()
    }

    /// Normalized posterior-like weights, one per member.
    ///
    /// The maximum log-likelihood is subtracted before exponentiation
    /// for numerical stability; members with an undefined reduced
    /// log-likelihood get weight zero. The result is non-negative and
    /// sums to 1.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::DegenerateWeights`] when no member has a
    /// positive weight.
    pub fn weights(&self) -> Result<Vec<f64>, SampleError> {
        let lls = self.log_likelihoods();
        let max = lls
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);
        if !max.is_finite() {
            return Err(SampleError::DegenerateWeights);
        }
        let mut weights: Vec<f64> = lls
            .iter()
            .map(|&ll| if ll.is_nan() { 0.0 } else { (ll - max).exp() })
            .collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return Err(SampleError::DegenerateWeights);
        }
        for w in &mut weights {
            *w /= total;
        }
        Ok(weights)
    }

    /// Draw the configured number of member ids with replacement,
    /// multinomially, according to [`weights`](Self::weights).
    ///
    /// With a seed configured the draw is reproducible; otherwise each
    /// call takes fresh entropy. Only members with nonzero weight can
    /// be drawn.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::DegenerateWeights`] when every weight is
    /// zero.
    pub fn resample(&self) -> Result<Vec<MemberId>, SampleError> {
        let weights = self.weights()?;

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for &w in &weights {
            acc += w;
            cumulative.push(acc);
        }

        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
        };

        let mut ids = Vec::with_capacity(self.n_samples);
        for _ in 0..self.n_samples {
            let u: f64 = rng.random::<f64>() * acc;
            let k = cumulative.partition_point(|&c| c <= u);
            ids.push(self.members[k].0);
        }
        Ok(ids)
    }
}

impl ImportanceSamplerBuilder {
    /// Set the observed mean field.
    pub fn observed_mean(mut self, grid: Grid2) -> Self {
        self.observed_mean = Some(grid);
        self
    }

    /// Set the observed standard-deviation field.
    pub fn observed_std(mut self, grid: Grid2) -> Self {
        self.observed_std = Some(grid);
        self
    }

    /// Append one ensemble member's simulated field.
    pub fn member(mut self, id: MemberId, grid: Grid2) -> Self {
        self.members.push((id, grid));
        self
    }

    /// Set the likelihood form (default: [`LogNormal`]).
    pub fn likelihood(mut self, likelihood: impl LogLikelihood + 'static) -> Self {
        self.likelihood = Box::new(likelihood);
        self
    }

    /// Set the observational-uncertainty multiplier (default: `1.0`).
    ///
    /// Inflates the observed standard deviation before likelihood
    /// evaluation to absorb model-structural error and grid mismatch.
    /// Must be positive and finite.
    pub fn fudge_factor(mut self, factor: f64) -> Self {
        self.fudge_factor = factor;
        self
    }

    /// Set the number of ids to draw (default: the ensemble size).
    pub fn n_samples(mut self, n: usize) -> Self {
        self.n_samples = Some(n);
        self
    }

    /// Seed the resampling RNG for a reproducible draw.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the sampler, validating all configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `observed_mean` or `observed_std` is not set
    /// - the fudge factor is not positive and finite
    /// - no members were added, or `n_samples` is zero
    /// - any field's shape differs from the observed mean's
    pub fn build(self) -> Result<ImportanceSampler, SampleError> {
        let observed_mean = self
            .observed_mean
            .ok_or(SampleError::MissingInput {
                what: "observed_mean",
            })?;
        let observed_std = self.observed_std.ok_or(SampleError::MissingInput {
            what: "observed_std",
        })?;

        if !self.fudge_factor.is_finite() || self.fudge_factor <= 0.0 {
            return Err(SampleError::InvalidFudgeFactor {
                value: self.fudge_factor,
            });
        }
        if self.members.is_empty() {
            return Err(SampleError::EmptyEnsemble);
        }

        let expected = observed_mean.shape();
        if observed_std.shape() != expected {
            return Err(SampleError::ShapeMismatch {
                expected,
                found: observed_std.shape(),
            });
        }
        for (_, grid) in &self.members {
            if grid.shape() != expected {
                return Err(SampleError::ShapeMismatch {
                    expected,
                    found: grid.shape(),
                });
            }
        }

        let n_samples = self.n_samples.unwrap_or(self.members.len());
        if n_samples == 0 {
            return Err(SampleError::ZeroSamples);
        }

        Ok(ImportanceSampler {
            observed_mean,
            observed_std,
            members: self.members,
            likelihood: self.likelihood,
            fudge_factor: self.fudge_factor,
            n_samples,
            seed: self.seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::likelihood::LogPseudoHuber;
    use proptest::prelude::*;

    fn base_builder() -> ImportanceSamplerBuilder {
        ImportanceSampler::builder()
            .observed_mean(Grid2::filled(2, 2, 100.0))
            .observed_std(Grid2::filled(2, 2, 10.0))
    }

    // ---------------------------------------------------------------
    // Builder validation
    // ---------------------------------------------------------------

    #[test]
    fn builder_rejects_missing_observed() {
        let err = ImportanceSampler::builder()
            .member(MemberId(0), Grid2::filled(2, 2, 0.0))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SampleError::MissingInput {
                what: "observed_mean"
            }
        );
    }

    #[test]
    fn builder_rejects_bad_fudge_factor() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = base_builder()
                .member(MemberId(0), Grid2::filled(2, 2, 0.0))
                .fudge_factor(bad)
                .build()
                .unwrap_err();
            assert!(matches!(err, SampleError::InvalidFudgeFactor { .. }), "{bad}");
        }
    }

    #[test]
    fn builder_rejects_empty_ensemble() {
        assert_eq!(base_builder().build().unwrap_err(), SampleError::EmptyEnsemble);
    }

    #[test]
    fn builder_rejects_zero_samples() {
        let err = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 0.0))
            .n_samples(0)
            .build()
            .unwrap_err();
        assert_eq!(err, SampleError::ZeroSamples);
    }

    #[test]
    fn builder_rejects_shape_mismatch() {
        let err = base_builder()
            .member(MemberId(0), Grid2::filled(3, 2, 0.0))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SampleError::ShapeMismatch {
                expected: (2, 2),
                found: (3, 2),
            }
        );
    }

    // ---------------------------------------------------------------
    // Weights
    // ---------------------------------------------------------------

    #[test]
    fn weights_are_normalized() {
        let sampler = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 95.0))
            .member(MemberId(1), Grid2::filled(2, 2, 120.0))
            .member(MemberId(2), Grid2::filled(2, 2, 180.0))
            .build()
            .unwrap();
        let w = sampler.weights().unwrap();
        assert_eq!(w.len(), 3);
        assert!(w.iter().all(|&v| v >= 0.0));
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // Closest member dominates.
        assert!(w[0] > w[1] && w[1] > w[2]);
    }

    #[test]
    fn all_nan_member_gets_zero_weight() {
        let sampler = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .member(MemberId(1), Grid2::filled(2, 2, f64::NAN))
            .build()
            .unwrap();
        let w = sampler.weights().unwrap();
        assert_eq!(w[1], 0.0);
        assert!((w[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn nan_cells_are_excluded_not_propagated() {
        let mut partly_missing = Grid2::filled(2, 2, 100.0);
        partly_missing.set(0, 0, f64::NAN);
        let sampler = base_builder()
            .member(MemberId(0), partly_missing)
            .build()
            .unwrap();
        let lls = sampler.log_likelihoods();
        assert!(lls[0].is_finite());
    }

    #[test]
    fn degenerate_weights_is_an_error() {
        // Zero observational sigma makes every cell undefined.
        let sampler = ImportanceSampler::builder()
            .observed_mean(Grid2::filled(2, 2, 100.0))
            .observed_std(Grid2::filled(2, 2, 0.0))
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .build()
            .unwrap();
        assert_eq!(sampler.weights().unwrap_err(), SampleError::DegenerateWeights);
        assert_eq!(sampler.resample().unwrap_err(), SampleError::DegenerateWeights);
    }

    // ---------------------------------------------------------------
    // Resampling
    // ---------------------------------------------------------------

    #[test]
    fn resample_returns_requested_count() {
        let sampler = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .member(MemberId(1), Grid2::filled(2, 2, 90.0))
            .n_samples(37)
            .seed(7)
            .build()
            .unwrap();
        assert_eq!(sampler.resample().unwrap().len(), 37);
    }

    #[test]
    fn resample_is_deterministic_with_seed() {
        let make = || {
            base_builder()
                .member(MemberId(0), Grid2::filled(2, 2, 100.0))
                .member(MemberId(1), Grid2::filled(2, 2, 110.0))
                .member(MemberId(2), Grid2::filled(2, 2, 90.0))
                .n_samples(50)
                .seed(1234)
                .build()
                .unwrap()
        };
        assert_eq!(make().resample().unwrap(), make().resample().unwrap());
    }

    #[test]
    fn zero_weight_member_is_never_drawn() {
        let sampler = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .member(MemberId(1), Grid2::filled(2, 2, f64::NAN))
            .n_samples(500)
            .seed(99)
            .build()
            .unwrap();
        let ids = sampler.resample().unwrap();
        assert!(ids.iter().all(|&id| id == MemberId(0)));
    }

    #[test]
    fn robust_likelihood_shrinks_the_gap() {
        // Member 1 is off by a large residual; the pseudo-Huber form
        // should give it more relative weight than the Gaussian form.
        let gaussian = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .member(MemberId(1), Grid2::filled(2, 2, 400.0))
            .build()
            .unwrap();
        let robust = base_builder()
            .member(MemberId(0), Grid2::filled(2, 2, 100.0))
            .member(MemberId(1), Grid2::filled(2, 2, 400.0))
            .likelihood(LogPseudoHuber::default())
            .build()
            .unwrap();
        let wg = gaussian.weights().unwrap();
        let wr = robust.weights().unwrap();
        assert!(wr[1] > wg[1]);
    }

    proptest! {
        #[test]
        fn weights_always_normalized(
            values in proptest::collection::vec(50.0f64..150.0, 2..8),
        ) {
            let mut builder = base_builder();
            for (i, v) in values.iter().enumerate() {
                builder = builder.member(MemberId(i as u32), Grid2::filled(2, 2, *v));
            }
            let sampler = builder.build().unwrap();
            let w = sampler.weights().unwrap();
            prop_assert!(w.iter().all(|&v| v >= 0.0));
            prop_assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
