//! Core types for the Firn ensemble calibration toolkit.
//!
//! This is the leaf crate with zero dependencies. It defines the
//! fundamental types shared across the Firn workspace: ensemble member
//! identifiers, planar geometry primitives, and the perturbation sample
//! used to deform a velocity uncertainty envelope.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod point;
pub mod sample;

pub use id::MemberId;
pub use point::{Point, Vec2};
pub use sample::{InvalidSample, PerturbationSample};
