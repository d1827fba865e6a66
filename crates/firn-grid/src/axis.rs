//! Coordinate axes with binary-search cell lookup.

use crate::error::GridError;

/// A strictly increasing coordinate axis of a regular rectilinear grid.
///
/// Axis coordinates are the cell-corner positions; the axis with `n`
/// coordinates defines `n - 1` cells. Lookup is a binary search rather
/// than a linear scan, which matters once trajectory integration makes
/// millions of point queries per sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    values: Vec<f64>,
}

impl Axis {
    /// Construct an axis from coordinate values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AxisTooShort`] for fewer than 2 coordinates
    /// and [`GridError::AxisNotMonotonic`] if any coordinate is
    /// non-finite or not strictly greater than its predecessor.
    pub fn new(values: Vec<f64>) -> Result<Self, GridError> {
        if values.len() < 2 {
            return Err(GridError::AxisTooShort { len: values.len() });
        }
        if !values[0].is_finite() {
            return Err(GridError::AxisNotMonotonic { index: 0 });
        }
        for i in 1..values.len() {
            if !values[i].is_finite() || values[i] <= values[i - 1] {
                return Err(GridError::AxisNotMonotonic { index: i });
            }
        }
        Ok(Self { values })
    }

    /// Build a uniform axis of `n` coordinates starting at `origin`
    /// with the given spacing.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AxisTooShort`] if `n < 2`, or
    /// [`GridError::AxisNotMonotonic`] if `spacing` is not positive.
    pub fn uniform(origin: f64, spacing: f64, n: usize) -> Result<Self, GridError> {
        let values = (0..n).map(|i| origin + spacing * i as f64).collect();
        Self::new(values)
    }

    /// Number of coordinates on the axis.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; an axis holds at least 2 coordinates.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The coordinate values, in increasing order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The smallest coordinate.
    pub fn min(&self) -> f64 {
        self.values[0]
    }

    /// The largest coordinate.
    pub fn max(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Locate the cell containing `v` by binary search.
    ///
    /// Returns the index `i` of the interval `[values[i], values[i+1]]`
    /// enclosing `v`, or `None` if `v` is NaN or outside
    /// `[min, max]`. Both domain boundaries are inclusive; `v == max`
    /// resolves to the last cell.
    pub fn cell_of(&self, v: f64) -> Option<usize> {
        if !(v >= self.min() && v <= self.max()) {
            return None;
        }
        let i = self.values.partition_point(|&a| a <= v);
        // i is in [1, len]; len occurs only for v == max.
        Some(i.min(self.values.len() - 1) - 1)
    }
}
