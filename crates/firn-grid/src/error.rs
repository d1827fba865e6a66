//! Error types for grid construction.

use std::fmt;

/// Errors arising from axis or field construction.
///
/// Points falling outside a grid during interpolation are *not* errors:
/// they produce a `NaN` / `None` sentinel result, which trajectory code
/// treats as the signal to stop. This enum only covers structurally
/// invalid inputs, which fail fast before any numerical work.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// A coordinate axis is too short to define any grid cell.
    AxisTooShort {
        /// Number of coordinates supplied.
        len: usize,
    },
    /// A coordinate axis is not strictly increasing or contains a
    /// non-finite value.
    AxisNotMonotonic {
        /// Index of the first offending coordinate.
        index: usize,
    },
    /// A field's data length does not match its declared shape.
    DataLengthMismatch {
        /// Declared `(nx, ny)` shape.
        shape: (usize, usize),
        /// Actual data length.
        len: usize,
    },
    /// Two grids (or a grid and its axes) disagree on shape.
    ShapeMismatch {
        /// Expected `(nx, ny)` shape.
        expected: (usize, usize),
        /// Shape found instead.
        found: (usize, usize),
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisTooShort { len } => {
                write!(f, "axis needs at least 2 coordinates, got {len}")
            }
            Self::AxisNotMonotonic { index } => {
                write!(f, "axis is not strictly increasing at index {index}")
            }
            Self::DataLengthMismatch { shape, len } => {
                write!(
                    f,
                    "field data length {len} does not match shape {}x{}",
                    shape.0, shape.1
                )
            }
            Self::ShapeMismatch { expected, found } => {
                write!(
                    f,
                    "grid shape mismatch: expected {}x{}, found {}x{}",
                    expected.0, expected.1, found.0, found.1
                )
            }
        }
    }
}

impl std::error::Error for GridError {}
