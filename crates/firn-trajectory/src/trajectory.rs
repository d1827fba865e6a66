//! Trajectory assembly from repeated RKF steps.

use firn_core::Point;
use firn_grid::VelocityField;

use crate::error::TrajectoryError;
use crate::rkf::rkf45_step_signed;

/// Integration parameters shared by every trajectory of a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectoryParams {
    /// Nominal step length in the time unit of the velocity field
    /// (e.g. years for m/yr velocities). Must be positive and finite.
    pub dt: f64,
    /// Total integration time; stepping stops once the accumulated
    /// time exceeds it. Must be non-negative and finite.
    pub total_time: f64,
    /// Integrate backward in time (upstream) by negating both
    /// velocity components.
    pub reverse: bool,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        Self {
            dt: 1.0,
            total_time: 10_000.0,
            reverse: false,
        }
    }
}

impl TrajectoryParams {
    /// Check the parameters, failing fast before any integration.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidParams`] for a non-positive or
    /// non-finite `dt`, or a negative or non-finite `total_time`.
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(TrajectoryError::InvalidParams {
                reason: format!("dt must be positive and finite, got {}", self.dt),
            });
        }
        if !self.total_time.is_finite() || self.total_time < 0.0 {
            return Err(TrajectoryError::InvalidParams {
                reason: format!(
                    "total_time must be non-negative and finite, got {}",
                    self.total_time
                ),
            });
        }
        Ok(())
    }
}

/// One integrated particle path.
///
/// An ordered, finite sequence of positions with a parallel sequence
/// of local error estimates. The first entries are always the seed
/// point and `0.0`. A trajectory is owned by the call that produced it
/// and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    points: Vec<Point>,
    error_estimates: Vec<f64>,
}

impl Trajectory {
    /// The integrated positions, seed first.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Per-point local error estimates, parallel to
    /// [`points`](Self::points); the seed's entry is `0.0`.
    pub fn error_estimates(&self) -> &[f64] {
        &self.error_estimates
    }

    /// Number of points (at least 1).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a trajectory contains at least its seed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The seed point.
    pub fn seed(&self) -> Point {
        self.points[0]
    }

    /// The final point reached.
    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }
}

/// Integrate a trajectory from `seed` through `field`.
///
/// Applies [`rkf45_step`](crate::rkf::rkf45_step) repeatedly,
/// accumulating elapsed time, until the accumulated time exceeds
/// `params.total_time` or a step fails because the particle left the
/// grid. The stop comparison is `<=`, so the final step may overshoot
/// `total_time` by up to one `dt`; callers wanting an exact horizon
/// choose `dt` dividing `total_time`. Early termination at the grid
/// edge is expected behavior and still yields a complete, well-formed
/// trajectory.
///
/// A seed already outside the grid yields a single-point trajectory.
///
/// # Errors
///
/// Returns [`TrajectoryError::InvalidParams`] if `params` fail
/// validation; the integration itself cannot fail.
pub fn compute_trajectory(
    field: &VelocityField,
    seed: Point,
    params: &TrajectoryParams,
) -> Result<Trajectory, TrajectoryError> {
    params.validate()?;
    let sign = if params.reverse { -1.0 } else { 1.0 };

    let mut points = vec![seed];
    let mut error_estimates = vec![0.0];
    let mut point = seed;
    let mut time = 0.0f64;

    while time.abs() <= params.total_time {
        match rkf45_step_signed(field, point, params.dt, sign) {
            Some((next, error_estimate)) => {
                points.push(next);
                error_estimates.push(error_estimate);
                point = next;
                time += params.dt;
            }
            None => break,
        }
    }

    Ok(Trajectory {
        points,
        error_estimates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use firn_grid::{Axis, Grid2};

    fn uniform_field(n: usize, vx: f64, vy: f64) -> VelocityField {
        let x = Axis::uniform(0.0, 1.0, n).unwrap();
        let y = Axis::uniform(0.0, 1.0, n).unwrap();
        VelocityField::new(
            x,
            y,
            Grid2::filled(n, n, vx),
            Grid2::filled(n, n, vy),
        )
        .unwrap()
    }

    #[test]
    fn invalid_params_fail_fast() {
        let field = uniform_field(3, 1.0, 0.0);
        let bad_dt = TrajectoryParams {
            dt: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            compute_trajectory(&field, Point::new(1.0, 1.0), &bad_dt),
            Err(TrajectoryError::InvalidParams { .. })
        ));
        let bad_total = TrajectoryParams {
            total_time: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            compute_trajectory(&field, Point::new(1.0, 1.0), &bad_total),
            Err(TrajectoryError::InvalidParams { .. })
        ));
    }

    #[test]
    fn seed_outside_grid_yields_seed_only() {
        let field = uniform_field(3, 1.0, 0.0);
        let seed = Point::new(-5.0, 1.0);
        let traj = compute_trajectory(&field, seed, &TrajectoryParams::default()).unwrap();
        assert_eq!(traj.points(), &[seed]);
        assert_eq!(traj.error_estimates(), &[0.0]);
        assert_eq!(traj.len(), 1);
    }

    #[test]
    fn stops_at_grid_edge() {
        // Uniform eastward flow on a 3x3 grid, seeded off the node so
        // the failing stage probe clears the boundary by a wide margin:
        // steps succeed up to x = 1.95, then the probe at 2.05 exits.
        let field = uniform_field(3, 1.0, 0.0);
        let params = TrajectoryParams {
            dt: 0.1,
            total_time: 100.0,
            reverse: false,
        };
        let traj = compute_trajectory(&field, Point::new(1.05, 1.0), &params).unwrap();
        assert_eq!(traj.len(), 10);
        assert!((traj.end().x - 1.95).abs() < 1e-9);
        assert_eq!(traj.end().y, 1.0);
    }

    #[test]
    fn time_boundary_allows_one_step_overshoot() {
        // With dt = 0.1 and total_time = 1.0 the `<=` stop comparison
        // admits an 11th step, ending at x0 + 1.1.
        let field = uniform_field(11, 1.0, 0.0);
        let params = TrajectoryParams {
            dt: 0.1,
            total_time: 1.0,
            reverse: false,
        };
        let traj = compute_trajectory(&field, Point::new(1.0, 5.0), &params).unwrap();
        assert_eq!(traj.len(), 12);
        assert!((traj.end().x - 2.1).abs() < 1e-9);
    }

    #[test]
    fn reverse_flows_upstream() {
        let field = uniform_field(11, 1.0, 0.0);
        let params = TrajectoryParams {
            dt: 0.1,
            total_time: 1.0,
            reverse: true,
        };
        let traj = compute_trajectory(&field, Point::new(5.0, 5.0), &params).unwrap();
        assert!(traj.end().x < 4.0 + 1e-9);
        assert_eq!(traj.end().y, 5.0);
    }

    #[test]
    fn trajectories_are_deterministic() {
        let field = uniform_field(11, 0.7, -0.3);
        let params = TrajectoryParams {
            dt: 0.25,
            total_time: 5.0,
            reverse: false,
        };
        let a = compute_trajectory(&field, Point::new(2.0, 8.0), &params).unwrap();
        let b = compute_trajectory(&field, Point::new(2.0, 8.0), &params).unwrap();
        assert_eq!(a, b);
    }
}
