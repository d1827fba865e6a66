//! Error types for importance sampling.

use std::fmt;

/// Errors from sampler configuration and weight evaluation.
///
/// Configuration problems (missing inputs, non-positive fudge factor,
/// mismatched grids) are detected at build time, before any numerical
/// work. [`SampleError::DegenerateWeights`] is the one data error: the
/// likelihood assigned zero probability to every member, so no valid
/// posterior exists and the sampling call must fail rather than return
/// a default.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleError {
    /// A required builder input was not supplied.
    MissingInput {
        /// Name of the missing input.
        what: &'static str,
    },
    /// The observational-uncertainty multiplier is not positive and finite.
    InvalidFudgeFactor {
        /// The offending value.
        value: f64,
    },
    /// The requested sample count is zero.
    ZeroSamples,
    /// The ensemble contains no members.
    EmptyEnsemble,
    /// Observed and simulated fields are not on the same grid.
    ShapeMismatch {
        /// Expected `(nx, ny)` shape.
        expected: (usize, usize),
        /// Shape found instead.
        found: (usize, usize),
    },
    /// Every ensemble member received zero weight.
    DegenerateWeights,
    /// No grid cell has valid values in both fields.
    NoValidCells,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput { what } => write!(f, "missing required input: {what}"),
            Self::InvalidFudgeFactor { value } => {
                write!(f, "fudge factor must be positive and finite, got {value}")
            }
            Self::ZeroSamples => write!(f, "requested sample count must be at least 1"),
            Self::EmptyEnsemble => write!(f, "ensemble has no members"),
            Self::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "field shape mismatch: expected {}x{}, found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
            Self::DegenerateWeights => {
                write!(f, "all ensemble weights are zero; no valid posterior exists")
            }
            Self::NoValidCells => write!(f, "no grid cell is valid in both fields"),
        }
    }
}

impl std::error::Error for SampleError {}
