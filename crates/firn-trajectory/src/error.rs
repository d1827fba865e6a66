//! Error types for trajectory integration and perturbation sweeps.

use std::error::Error;
use std::fmt;

use firn_core::InvalidSample;
use firn_grid::GridError;

/// Errors from perturbation construction and sweep configuration.
///
/// A trajectory leaving the grid is *not* represented here: that is a
/// recoverable per-point domain condition signaled by `None`/`NaN`
/// sentinels, and it terminates the affected trajectory locally. This
/// enum covers invalid inputs, which abort the enclosing call.
#[derive(Clone, Debug, PartialEq)]
pub enum TrajectoryError {
    /// The uncertainty multiplier is not positive and finite.
    InvalidSigma {
        /// The offending value.
        value: f64,
    },
    /// A perturbation sample fraction was outside the unit square.
    Sample(InvalidSample),
    /// Integration parameters are invalid.
    InvalidParams {
        /// What went wrong.
        reason: String,
    },
    /// Velocity grids are structurally inconsistent.
    Grid(GridError),
    /// Mean and uncertainty fields are not on the same coordinate axes.
    AxisMismatch,
    /// The feature source failed to deliver its features.
    Source {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for TrajectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSigma { value } => {
                write!(f, "sigma must be positive and finite, got {value}")
            }
            Self::Sample(e) => write!(f, "{e}"),
            Self::InvalidParams { reason } => write!(f, "invalid integration parameters: {reason}"),
            Self::Grid(e) => write!(f, "{e}"),
            Self::AxisMismatch => {
                write!(f, "velocity fields are not on the same coordinate axes")
            }
            Self::Source { reason } => write!(f, "feature source failed: {reason}"),
        }
    }
}

impl Error for TrajectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sample(e) => Some(e),
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InvalidSample> for TrajectoryError {
    fn from(e: InvalidSample) -> Self {
        Self::Sample(e)
    }
}

impl From<GridError> for TrajectoryError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}
