//! Paired velocity component grids sampled by bilinear interpolation.

use firn_core::{Point, Vec2};

use crate::axis::Axis;
use crate::error::GridError;
use crate::grid::Grid2;

/// A 2D velocity field on a regular grid.
///
/// Holds the x/y coordinate axes and one [`Grid2`] per velocity
/// component. The field is read-only after construction; perturbed
/// realizations are derived as new fields rather than mutated in place,
/// so a field can be shared freely across sweep workers.
#[derive(Clone, Debug)]
pub struct VelocityField {
    x: Axis,
    y: Axis,
    vx: Grid2,
    vy: Grid2,
}

impl VelocityField {
    /// Assemble a velocity field, validating that both component grids
    /// match the axis lengths.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if either component grid's
    /// shape differs from `(x.len(), y.len())`.
    pub fn new(x: Axis, y: Axis, vx: Grid2, vy: Grid2) -> Result<Self, GridError> {
        let expected = (x.len(), y.len());
        for grid in [&vx, &vy] {
            if grid.shape() != expected {
                return Err(GridError::ShapeMismatch {
                    expected,
                    found: grid.shape(),
                });
            }
        }
        Ok(Self { x, y, vx, vy })
    }

    /// The x coordinate axis.
    pub fn x_axis(&self) -> &Axis {
        &self.x
    }

    /// The y coordinate axis.
    pub fn y_axis(&self) -> &Axis {
        &self.y
    }

    /// The x velocity component grid.
    pub fn vx(&self) -> &Grid2 {
        &self.vx
    }

    /// The y velocity component grid.
    pub fn vy(&self) -> &Grid2 {
        &self.vy
    }

    /// Sample both velocity components at a point.
    ///
    /// Returns `None` when the point lies outside the grid domain or
    /// when either interpolated component is undefined (missing data in
    /// the enclosing cell). This is the domain-error sentinel: callers
    /// integrating trajectories treat it as "stop here", not a failure.
    pub fn velocity_at(&self, point: Point) -> Option<Vec2> {
        let vx = self.vx.bilinear(&self.x, &self.y, point.x, point.y);
        let vy = self.vy.bilinear(&self.x, &self.y, point.x, point.y);
        if vx.is_nan() || vy.is_nan() {
            return None;
        }
        Some(Vec2::new(vx, vy))
    }

    /// Sample both components at many points.
    ///
    /// Returns one vector per component, parallel to `points`, with
    /// `NaN` entries for points where the velocity is undefined. Useful
    /// for annotating trajectory tables where undefined samples must
    /// stay aligned with their rows.
    pub fn velocity_at_points(&self, points: &[Point]) -> (Vec<f64>, Vec<f64>) {
        let mut vx = Vec::with_capacity(points.len());
        let mut vy = Vec::with_capacity(points.len());
        for p in points {
            vx.push(self.vx.bilinear(&self.x, &self.y, p.x, p.y));
            vy.push(self.vy.bilinear(&self.x, &self.y, p.x, p.y));
        }
        (vx, vy)
    }

    /// `true` if the point lies within the axis bounds.
    pub fn contains(&self, point: Point) -> bool {
        self.x.cell_of(point.x).is_some() && self.y.cell_of(point.y).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_field() -> VelocityField {
        let x = Axis::uniform(0.0, 1.0, 4).unwrap();
        let y = Axis::uniform(0.0, 1.0, 3).unwrap();
        // vx increases linearly with x, vy with y.
        let vx = Grid2::from_fn(4, 3, |ix, _| ix as f64 * 10.0);
        let vy = Grid2::from_fn(4, 3, |_, iy| iy as f64 * -5.0);
        VelocityField::new(x, y, vx, vy).unwrap()
    }

    #[test]
    fn rejects_component_shape_mismatch() {
        let x = Axis::uniform(0.0, 1.0, 4).unwrap();
        let y = Axis::uniform(0.0, 1.0, 3).unwrap();
        let vx = Grid2::filled(4, 3, 0.0);
        let vy = Grid2::filled(3, 4, 0.0);
        assert!(matches!(
            VelocityField::new(x, y, vx, vy),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn samples_linear_ramp_exactly() {
        let field = ramp_field();
        let v = field.velocity_at(Point::new(1.5, 1.0)).unwrap();
        assert!((v.x - 15.0).abs() < 1e-12);
        assert!((v.y + 5.0).abs() < 1e-12);
    }

    #[test]
    fn outside_is_none() {
        let field = ramp_field();
        assert!(field.velocity_at(Point::new(-0.5, 1.0)).is_none());
        assert!(field.velocity_at(Point::new(1.0, 2.5)).is_none());
        assert!(!field.contains(Point::new(3.2, 0.0)));
        assert!(field.contains(Point::new(3.0, 2.0)));
    }

    #[test]
    fn missing_component_cell_is_none() {
        let x = Axis::uniform(0.0, 1.0, 3).unwrap();
        let y = Axis::uniform(0.0, 1.0, 3).unwrap();
        let mut vx = Grid2::filled(3, 3, 1.0);
        vx.set(0, 0, f64::NAN);
        let vy = Grid2::filled(3, 3, 0.0);
        let field = VelocityField::new(x, y, vx, vy).unwrap();
        assert!(field.velocity_at(Point::new(0.5, 0.5)).is_none());
        assert!(field.velocity_at(Point::new(1.5, 1.5)).is_some());
    }

    #[test]
    fn batch_sampling_uses_nan_sentinels() {
        let field = ramp_field();
        let pts = [Point::new(0.5, 0.5), Point::new(99.0, 0.0)];
        let (vx, vy) = field.velocity_at_points(&pts);
        assert!((vx[0] - 5.0).abs() < 1e-12);
        assert!(vx[1].is_nan());
        assert!(vy[1].is_nan());
    }
}
