//! Worker-pool execution of independent perturbation sweeps.
//!
//! Perturbation draws share nothing but read-only inputs, so the sweep
//! is an embarrassingly-parallel map: tasks go out over a crossbeam
//! channel to scoped worker threads, each worker runs
//! [`compute_perturbation`](firn_trajectory::compute_perturbation) to
//! completion for its draw, and results come back tagged with their
//! perturbation index so the output order is deterministic regardless
//! of scheduling.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;

pub use config::SweepConfig;
pub use error::SweepError;
pub use pool::run_sweep;
