//! Shared fixtures for Firn benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use firn_grid::{Axis, Grid2, VelocityField};

/// A deterministic pseudo-random value in `[0, 1)` for benchmark data.
pub fn hash01(i: u64) -> f64 {
    let h = i.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// An `n x n` velocity field with mildly varying components.
pub fn bench_field(n: usize) -> VelocityField {
    let x = Axis::uniform(0.0, 1.0, n).expect("valid bench axis");
    let y = Axis::uniform(0.0, 1.0, n).expect("valid bench axis");
    let vx = Grid2::from_fn(n, n, |ix, iy| 1.0 + 0.1 * hash01((ix * n + iy) as u64));
    let vy = Grid2::from_fn(n, n, |ix, iy| 0.5 - 0.1 * hash01((iy * n + ix) as u64));
    VelocityField::new(x, y, vx, vy).expect("valid bench field")
}
