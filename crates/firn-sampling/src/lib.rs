//! Importance resampling of simulation ensembles against observations.
//!
//! Given an observed field with per-cell uncertainty and a stack of
//! simulated fields (one per ensemble member) on the same grid, the
//! [`ImportanceSampler`] evaluates a pointwise log-likelihood for every
//! member, reduces it NaN-safely over the grid, normalizes the result
//! into posterior-like weights, and draws member ids with replacement
//! proportionally to those weights.
//!
//! Two likelihood forms are provided: [`LogNormal`] and the robust
//! [`LogPseudoHuber`], which downweights outlier cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod likelihood;
pub mod metrics;
pub mod sampler;

pub use error::SampleError;
pub use likelihood::{log_normal, log_pseudo_huber, LogLikelihood, LogNormal, LogPseudoHuber};
pub use metrics::rmse;
pub use sampler::{ImportanceSampler, ImportanceSamplerBuilder};
