//! Test fixtures for Firn development.
//!
//! Synthetic velocity fields and an in-memory [`FeatureSource`] so
//! integration tests can exercise sweeps without any dataset I/O.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use firn_core::Point;
use firn_grid::{Axis, Grid2, VelocityField};
use firn_trajectory::{AttrMap, AttrValue, Feature, FeatureSource, TrajectoryError};

/// A square uniform axis starting at 0 with unit spacing.
pub fn unit_axis(n: usize) -> Axis {
    Axis::uniform(0.0, 1.0, n).expect("valid test axis")
}

/// An `n x n` velocity field with constant components.
pub fn uniform_field(n: usize, vx: f64, vy: f64) -> VelocityField {
    VelocityField::new(
        unit_axis(n),
        unit_axis(n),
        Grid2::filled(n, n, vx),
        Grid2::filled(n, n, vy),
    )
    .expect("valid test field")
}

/// An `n x n` field built from per-cell component functions.
pub fn field_from_fn(
    n: usize,
    vx: impl FnMut(usize, usize) -> f64,
    vy: impl FnMut(usize, usize) -> f64,
) -> VelocityField {
    VelocityField::new(
        unit_axis(n),
        unit_axis(n),
        Grid2::from_fn(n, n, vx),
        Grid2::from_fn(n, n, vy),
    )
    .expect("valid test field")
}

/// A feature named via a `"name"` text attribute.
pub fn named_feature(name: &str, vertices: &[(f64, f64)]) -> Feature {
    let mut attributes = AttrMap::new();
    attributes.insert("name".to_string(), AttrValue::Text(name.to_string()));
    Feature::new(
        vertices.iter().map(|&(x, y)| Point::new(x, y)),
        attributes,
    )
}

/// In-memory feature source cloning a fixed feature list per load.
///
/// Stands in for a vector dataset; `load` clones the features the way
/// a real implementation would re-open its handle per call.
pub struct MemoryFeatureSource {
    features: Vec<Feature>,
}

impl MemoryFeatureSource {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl FeatureSource for MemoryFeatureSource {
    fn load(&self) -> Result<Vec<Feature>, TrajectoryError> {
        Ok(self.features.clone())
    }
}

/// Feature source that always fails, for error-path tests.
pub struct FailingFeatureSource;

impl FeatureSource for FailingFeatureSource {
    fn load(&self) -> Result<Vec<Feature>, TrajectoryError> {
        Err(TrajectoryError::Source {
            reason: "simulated read failure".to_string(),
        })
    }
}
