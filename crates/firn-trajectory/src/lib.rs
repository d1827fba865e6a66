//! Adaptive streamline integration through perturbed velocity fields.
//!
//! The integrator advances seed points through a 2D velocity field with
//! an embedded 4th/5th-order Runge-Kutta-Fehlberg step ([`rkf45_step`])
//! and assembles the resulting paths into [`Trajectory`] sequences and
//! flat, row-oriented [`TrajectoryTable`]s ready for export.
//!
//! Velocity uncertainty enters through the [`VelocityProvider`] trait:
//! given a [`PerturbationSample`](firn_core::PerturbationSample), a
//! provider materializes one perturbed realization of the field. The
//! two shipped providers deform an uncertainty envelope from mean and
//! error grids ([`EnvelopeProvider`]) or from precomputed min/max grids
//! ([`PrecomputedEnvelope`]); [`compute_perturbation`] runs one full
//! draw (every vertex of every feature) against either.
//!
//! A trajectory leaving the grid is expected behavior, not an error:
//! the step reports `None` and the path simply ends there.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod feature;
pub mod perturbation;
pub mod rkf;
pub mod table;
pub mod trajectory;

pub use error::TrajectoryError;
pub use feature::{AttrMap, AttrValue, Feature, FeatureSource};
pub use perturbation::{
    perturbed_velocities, EnvelopeProvider, PrecomputedEnvelope, VelocityProvider,
};
pub use rkf::rkf45_step;
pub use table::{compute_perturbation, trajectories_to_table, TrajectoryRow, TrajectoryTable};
pub use trajectory::{compute_trajectory, Trajectory, TrajectoryParams};
