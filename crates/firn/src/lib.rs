//! Firn: ensemble calibration kernels for ice-sheet models.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Firn sub-crates. For most users, adding `firn` as a single
//! dependency is sufficient.
//!
//! Two independent components share no state:
//!
//! - the **importance sampler** scores each ensemble member's simulated
//!   field against observations with uncertainty and draws a resampled
//!   set of member ids proportionally to the posterior-like weights;
//! - the **trajectory integrator** advances seed points through a
//!   (perturbed) 2D velocity field with embedded RKF4(5) steps and
//!   emits flat trajectory tables, optionally sweeping many
//!   perturbation draws over a worker pool.
//!
//! # Quick start
//!
//! ```rust
//! use firn::prelude::*;
//!
//! // Resample a 3-member ensemble against observations.
//! let observed = Grid2::filled(4, 4, 100.0);
//! let sampler = ImportanceSampler::builder()
//!     .observed_mean(observed.clone())
//!     .observed_std(Grid2::filled(4, 4, 10.0))
//!     .member(MemberId(0), observed.clone())
//!     .member(MemberId(1), Grid2::filled(4, 4, 300.0))
//!     .member(MemberId(2), Grid2::filled(4, 4, 500.0))
//!     .fudge_factor(3.0)
//!     .n_samples(10)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let ids = sampler.resample().unwrap();
//! assert!(ids.iter().all(|&id| id == MemberId(0)));
//!
//! // Integrate a trajectory through a uniform velocity field.
//! let x = Axis::uniform(0.0, 1.0, 11).unwrap();
//! let y = Axis::uniform(0.0, 1.0, 11).unwrap();
//! let field = VelocityField::new(
//!     x,
//!     y,
//!     Grid2::filled(11, 11, 1.0),
//!     Grid2::filled(11, 11, 0.0),
//! )
//! .unwrap();
//! let params = TrajectoryParams { dt: 0.5, total_time: 2.0, reverse: false };
//! let traj = compute_trajectory(&field, Point::new(1.0, 5.0), &params).unwrap();
//! assert!(traj.end().x > 3.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `firn-core` | Ids, points, perturbation samples |
//! | [`grid`] | `firn-grid` | Axes, gridded fields, bilinear interpolation |
//! | [`sampling`] | `firn-sampling` | Likelihoods, importance resampling, RMSE |
//! | [`trajectory`] | `firn-trajectory` | RKF45 stepping, perturbations, tables |
//! | [`sweep`] | `firn-sweep` | Worker-pool perturbation sweeps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core ids and geometry (`firn-core`).
pub use firn_core as types;

/// Axes, gridded fields, and interpolation (`firn-grid`).
pub use firn_grid as grid;

/// Likelihoods and importance resampling (`firn-sampling`).
pub use firn_sampling as sampling;

/// Trajectory integration and perturbation machinery (`firn-trajectory`).
pub use firn_trajectory as trajectory;

/// Worker-pool sweeps over perturbation draws (`firn-sweep`).
pub use firn_sweep as sweep;

/// Common imports for typical Firn usage.
///
/// ```rust
/// use firn::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use firn_core::{MemberId, PerturbationSample, Point, Vec2};

    // Grid
    pub use firn_grid::{Axis, Grid2, GridError, VelocityField};

    // Sampling
    pub use firn_sampling::{
        ImportanceSampler, LogLikelihood, LogNormal, LogPseudoHuber, SampleError,
    };

    // Trajectory
    pub use firn_trajectory::{
        compute_perturbation, compute_trajectory, EnvelopeProvider, Feature, FeatureSource,
        PrecomputedEnvelope, Trajectory, TrajectoryError, TrajectoryParams, TrajectoryTable,
        VelocityProvider,
    };

    // Sweep
    pub use firn_sweep::{run_sweep, SweepConfig, SweepError};
}
