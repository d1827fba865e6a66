//! Perturbation samples: fractional coordinates in the uncertainty envelope.

use std::error::Error;
use std::fmt;

/// A deterministic perturbation draw `(s_x, s_y)` in the unit square.
///
/// Each component selects a position within the velocity uncertainty
/// envelope for the corresponding velocity component: `0.0` is the
/// lower bound (`mean - sigma * err`), `1.0` the upper bound, `0.5`
/// the mean. A sweep over a grid of samples is a reproducible
/// sensitivity study, not a stochastic draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerturbationSample {
    sx: f64,
    sy: f64,
}

impl PerturbationSample {
    /// Construct a sample, validating both fractions lie in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSample`] if either component is NaN or outside
    /// the unit interval.
    pub fn new(sx: f64, sy: f64) -> Result<Self, InvalidSample> {
        if !(0.0..=1.0).contains(&sx) || !(0.0..=1.0).contains(&sy) {
            return Err(InvalidSample { sx, sy });
        }
        Ok(Self { sx, sy })
    }

    /// The sample at the envelope center `(0.5, 0.5)`, reproducing the
    /// mean field when the envelope is symmetric.
    pub fn center() -> Self {
        Self { sx: 0.5, sy: 0.5 }
    }

    /// Fraction for the x velocity component.
    pub fn sx(&self) -> f64 {
        self.sx
    }

    /// Fraction for the y velocity component.
    pub fn sy(&self) -> f64 {
        self.sy
    }
}

impl fmt::Display for PerturbationSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sx, self.sy)
    }
}

/// A perturbation sample component was outside the unit square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidSample {
    /// The offending x fraction.
    pub sx: f64,
    /// The offending y fraction.
    pub sy: f64,
}

impl fmt::Display for InvalidSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "perturbation sample ({}, {}) outside [0, 1] x [0, 1]",
            self.sx, self.sy
        )
    }
}

impl Error for InvalidSample {}
