//! Row-major 2D fields with NaN missing-value semantics.

use crate::axis::Axis;
use crate::error::GridError;

/// A 2D field of `f64` values on a regular rectilinear grid.
///
/// Storage is row-major with x varying fastest: the value at column
/// `ix`, row `iy` lives at `data[iy * nx + ix]`. `NaN` marks a missing
/// cell and propagates through every derived quantity as an undefined
/// result.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2 {
    nx: usize,
    ny: usize,
    data: Vec<f64>,
}

impl Grid2 {
    /// Construct a field from row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::DataLengthMismatch`] if `data.len()` is not
    /// `nx * ny`.
    pub fn new(nx: usize, ny: usize, data: Vec<f64>) -> Result<Self, GridError> {
        if data.len() != nx * ny {
            return Err(GridError::DataLengthMismatch {
                shape: (nx, ny),
                len: data.len(),
            });
        }
        Ok(Self { nx, ny, data })
    }

    /// Construct a field with every cell set to `value`.
    pub fn filled(nx: usize, ny: usize, value: f64) -> Self {
        Self {
            nx,
            ny,
            data: vec![value; nx * ny],
        }
    }

    /// Construct a field by evaluating `f(ix, iy)` for every cell.
    pub fn from_fn(nx: usize, ny: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                data.push(f(ix, iy));
            }
        }
        Self { nx, ny, data }
    }

    /// Number of columns (x direction).
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of rows (y direction).
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// The `(nx, ny)` shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// The raw row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at column `ix`, row `iy`.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        assert!(ix < self.nx && iy < self.ny, "grid index out of bounds");
        self.data[iy * self.nx + ix]
    }

    /// Set the value at column `ix`, row `iy`.
    ///
    /// # Panics
    ///
    /// Panics if the indices are out of bounds.
    pub fn set(&mut self, ix: usize, iy: usize, value: f64) {
        assert!(ix < self.nx && iy < self.ny, "grid index out of bounds");
        self.data[iy * self.nx + ix] = value;
    }

    /// Transform every cell with `f`, preserving the shape.
    pub fn map(&self, f: impl FnMut(f64) -> f64) -> Grid2 {
        Grid2 {
            nx: self.nx,
            ny: self.ny,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Combine two same-shaped fields cell-wise.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the shapes differ.
    pub fn zip_with(
        &self,
        other: &Grid2,
        mut f: impl FnMut(f64, f64) -> f64,
    ) -> Result<Grid2, GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f(a, b))
            .collect();
        Ok(Grid2 {
            nx: self.nx,
            ny: self.ny,
            data,
        })
    }

    /// Bilinearly interpolate the field at `(x, y)` on the given axes.
    ///
    /// The axes must match the field shape (`x_axis.len() == nx`,
    /// `y_axis.len() == ny`); this is validated when a
    /// [`VelocityField`](crate::velocity::VelocityField) is assembled.
    ///
    /// Returns `NaN` when the query point lies outside the axis bounds
    /// (no extrapolation, no clamping) or when any of the four corner
    /// values of the enclosing cell is missing. At an exact grid node
    /// the stored value is returned exactly.
    pub fn bilinear(&self, x_axis: &Axis, y_axis: &Axis, x: f64, y: f64) -> f64 {
        debug_assert_eq!(x_axis.len(), self.nx);
        debug_assert_eq!(y_axis.len(), self.ny);

        let (ix, iy) = match (x_axis.cell_of(x), y_axis.cell_of(y)) {
            (Some(ix), Some(iy)) => (ix, iy),
            _ => return f64::NAN,
        };

        let xs = x_axis.values();
        let ys = y_axis.values();
        let tx = (x - xs[ix]) / (xs[ix + 1] - xs[ix]);
        let ty = (y - ys[iy]) / (ys[iy + 1] - ys[iy]);

        let v00 = self.get(ix, iy);
        let v10 = self.get(ix + 1, iy);
        let v01 = self.get(ix, iy + 1);
        let v11 = self.get(ix + 1, iy + 1);

        // Weighted-corner form: at a node one weight is exactly 1 and
        // the rest 0, so stored values round-trip bit-exactly.
        (1.0 - ty) * ((1.0 - tx) * v00 + tx * v10) + ty * ((1.0 - tx) * v01 + tx * v11)
    }
}
