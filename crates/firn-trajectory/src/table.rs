//! Flat, row-oriented trajectory tables.

use std::sync::Arc;

use firn_core::PerturbationSample;
use firn_grid::VelocityField;

use crate::error::TrajectoryError;
use crate::feature::{AttrMap, FeatureSource};
use crate::perturbation::VelocityProvider;
use crate::trajectory::{compute_trajectory, Trajectory, TrajectoryParams};

/// One trajectory point as a table row.
///
/// Velocity components are sampled from the (unreversed) perturbed
/// field at the point position; `NaN` marks a point where the velocity
/// is undefined, which can only be the final point of a trajectory
/// that stopped at the grid edge.
#[derive(Clone, Debug)]
pub struct TrajectoryRow {
    /// Easting of the trajectory point.
    pub x: f64,
    /// Northing of the trajectory point.
    pub y: f64,
    /// Sampled x velocity component.
    pub vx: f64,
    /// Sampled y velocity component.
    pub vy: f64,
    /// Speed (velocity magnitude).
    pub speed: f64,
    /// Index of the trajectory within its feature (one per vertex).
    pub traj_id: usize,
    /// Index of the point within its trajectory (0 is the seed).
    pub traj_pt: usize,
    /// Distance from the previous point (0 at the seed).
    pub distance: f64,
    /// Cumulative distance from the seed.
    pub distance_from_origin: f64,
    /// Index of the perturbation draw that produced this row.
    pub perturbation: usize,
    /// Attributes of the source feature, shared across its rows.
    pub attributes: Arc<AttrMap>,
}

/// A flat table of trajectory rows, ready for export or plotting.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryTable {
    rows: Vec<TrajectoryRow>,
}

impl TrajectoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rows, in feature/trajectory/point order.
    pub fn rows(&self) -> &[TrajectoryRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append all rows of another table.
    pub fn extend(&mut self, other: TrajectoryTable) {
        self.rows.extend(other.rows);
    }
}

/// Flatten trajectories into table rows, annotating each point with
/// the sampled velocity, speed, step distance and cumulative distance
/// from the seed. All trajectories share one feature's attributes;
/// `traj_id` enumerates them in vertex order.
pub fn trajectories_to_table(
    trajectories: &[Trajectory],
    field: &VelocityField,
    attributes: &Arc<AttrMap>,
    perturbation: usize,
) -> TrajectoryTable {
    let mut table = TrajectoryTable::new();
    for (traj_id, trajectory) in trajectories.iter().enumerate() {
        let points = trajectory.points();
        let (vx, vy) = field.velocity_at_points(points);
        let mut distance_from_origin = 0.0;
        for (traj_pt, point) in points.iter().enumerate() {
            let distance = if traj_pt == 0 {
                0.0
            } else {
                point.distance(&points[traj_pt - 1])
            };
            distance_from_origin += distance;
            table.rows.push(TrajectoryRow {
                x: point.x,
                y: point.y,
                vx: vx[traj_pt],
                vy: vy[traj_pt],
                speed: vx[traj_pt].hypot(vy[traj_pt]),
                traj_id,
                traj_pt,
                distance,
                distance_from_origin,
                perturbation,
                attributes: Arc::clone(attributes),
            });
        }
    }
    table
}

/// Run one perturbation draw: integrate a trajectory from every vertex
/// of every feature through the perturbed field and aggregate the
/// results into one table.
///
/// This call is self-contained (it materializes its own perturbed
/// field and loads its own features), so a worker pool can invoke it
/// for many draws concurrently without sharing anything but the
/// read-only provider and source.
///
/// # Errors
///
/// Returns an error if the parameters, the provider, or the feature
/// source reject their inputs. Trajectories stopping at the grid edge
/// are not errors.
pub fn compute_perturbation(
    provider: &dyn VelocityProvider,
    source: &dyn FeatureSource,
    perturbation: usize,
    sample: PerturbationSample,
    params: &TrajectoryParams,
) -> Result<TrajectoryTable, TrajectoryError> {
    params.validate()?;
    let field = provider.velocity_field(sample)?;
    let features = source.load()?;

    let mut table = TrajectoryTable::new();
    for feature in features {
        let (vertices, attributes) = feature.into_parts();
        let attributes = Arc::new(attributes);
        let mut trajectories = Vec::with_capacity(vertices.len());
        for &vertex in &vertices {
            trajectories.push(compute_trajectory(&field, vertex, params)?);
        }
        table.extend(trajectories_to_table(
            &trajectories,
            &field,
            &attributes,
            perturbation,
        ));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use firn_core::Point;
    use firn_grid::{Axis, Grid2};

    fn uniform_field(n: usize, vx: f64, vy: f64) -> VelocityField {
        let x = Axis::uniform(0.0, 1.0, n).unwrap();
        let y = Axis::uniform(0.0, 1.0, n).unwrap();
        VelocityField::new(x, y, Grid2::filled(n, n, vx), Grid2::filled(n, n, vy)).unwrap()
    }

    #[test]
    fn rows_carry_velocity_and_distances() {
        let field = uniform_field(11, 2.0, 0.0);
        let params = TrajectoryParams {
            dt: 0.5,
            total_time: 2.0,
            reverse: false,
        };
        let trajectory = compute_trajectory(&field, Point::new(1.0, 5.0), &params).unwrap();
        let attrs = Arc::new(AttrMap::new());
        let table = trajectories_to_table(
            std::slice::from_ref(&trajectory),
            &field,
            &attrs,
            3,
        );

        assert_eq!(table.len(), trajectory.len());
        let first = &table.rows()[0];
        assert_eq!(first.distance, 0.0);
        assert_eq!(first.distance_from_origin, 0.0);
        assert_eq!(first.vx, 2.0);
        assert_eq!(first.speed, 2.0);
        assert_eq!(first.perturbation, 3);

        // Each 0.5-time step covers 1.0 of distance at speed 2.
        let second = &table.rows()[1];
        assert!((second.distance - 1.0).abs() < 1e-9);
        let last = table.rows().last().unwrap();
        assert!(
            (last.distance_from_origin - (table.len() as f64 - 1.0)).abs() < 1e-9
        );
    }

    #[test]
    fn traj_ids_enumerate_vertices() {
        let field = uniform_field(11, 1.0, 0.0);
        let params = TrajectoryParams {
            dt: 1.0,
            total_time: 1.0,
            reverse: false,
        };
        let a = compute_trajectory(&field, Point::new(1.0, 2.0), &params).unwrap();
        let b = compute_trajectory(&field, Point::new(1.0, 7.0), &params).unwrap();
        let attrs = Arc::new(AttrMap::new());
        let table = trajectories_to_table(&[a.clone(), b], &field, &attrs, 0);

        let ids: Vec<usize> = table.rows().iter().map(|r| r.traj_id).collect();
        assert!(ids[..a.len()].iter().all(|&id| id == 0));
        assert!(ids[a.len()..].iter().all(|&id| id == 1));
    }
}
