//! Error types for sweep execution.

use std::error::Error;
use std::fmt;

use firn_trajectory::TrajectoryError;

/// Errors from a perturbation sweep.
///
/// A sweep either returns every perturbation's table or fails as a
/// whole: partial results are never silently returned, since a missing
/// draw would bias any statistic computed over the sweep.
#[derive(Clone, Debug, PartialEq)]
pub enum SweepError {
    /// The shared integration parameters failed validation.
    InvalidParams {
        /// The underlying validation error.
        source: TrajectoryError,
    },
    /// One perturbation evaluation failed.
    PerturbationFailed {
        /// Index of the failing perturbation draw. When several draws
        /// fail, the lowest index is reported.
        index: usize,
        /// The underlying error.
        source: TrajectoryError,
    },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { source } => {
                write!(f, "invalid sweep parameters: {source}")
            }
            Self::PerturbationFailed { index, source } => {
                write!(f, "perturbation {index} failed: {source}")
            }
        }
    }
}

impl Error for SweepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidParams { source } | Self::PerturbationFailed { source, .. } => {
                Some(source)
            }
        }
    }
}
