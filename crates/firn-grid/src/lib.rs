//! Regular-grid fields and bilinear velocity interpolation.
//!
//! This crate defines the gridded data model shared by the importance
//! sampler and the trajectory integrator:
//!
//! - [`Axis`]: a strictly increasing coordinate axis with binary-search
//!   cell lookup
//! - [`Grid2`]: a row-major 2D field of `f64` values where `NaN` marks
//!   missing cells and propagates through interpolation as an undefined
//!   result, never a silent zero
//! - [`VelocityField`]: paired x/y velocity component grids on one axis
//!   pair, sampled at arbitrary points by bilinear interpolation
//!
//! Points outside the axis bounds interpolate to `NaN`; there is no
//! extrapolation or clamping. The upper domain boundary is inclusive.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod axis;
pub mod error;
pub mod grid;
pub mod velocity;

pub use axis::Axis;
pub use error::GridError;
pub use grid::Grid2;
pub use velocity::VelocityField;
