//! Embedded Runge-Kutta-Fehlberg 4(5) stepping.
//!
//! One step evaluates the velocity field at six stage points and
//! combines them with the classic Fehlberg tableau into both a
//! 4th-order and a 5th-order estimate of the new position. The
//! distance between the two estimates is the local truncation-error
//! estimate, obtained without the extra evaluations a step-halving
//! scheme would need. The outer step length stays fixed, keeping the
//! sampling density of a trajectory uniform in time; at the grid
//! resolutions in play, positional accuracy is limited by the grid,
//! not the integrator.

use firn_core::Point;
use firn_grid::VelocityField;

// Fehlberg stage coefficients.
const B21: f64 = 1.0 / 4.0;
const B31: f64 = 3.0 / 32.0;
const B32: f64 = 9.0 / 32.0;
const B41: f64 = 1932.0 / 2197.0;
const B42: f64 = -7200.0 / 2197.0;
const B43: f64 = 7296.0 / 2197.0;
const B51: f64 = 439.0 / 216.0;
const B52: f64 = -8.0;
const B53: f64 = 3680.0 / 513.0;
const B54: f64 = -845.0 / 4104.0;
const B61: f64 = -8.0 / 27.0;
const B62: f64 = 2.0;
const B63: f64 = -3544.0 / 2565.0;
const B64: f64 = 1859.0 / 4104.0;
const B65: f64 = -11.0 / 40.0;

// 4th-order solution weights.
const C1: f64 = 25.0 / 216.0;
const C3: f64 = 1408.0 / 2565.0;
const C4: f64 = 2197.0 / 4104.0;
const C5: f64 = -1.0 / 5.0;

// 5th-order solution weights.
const D1: f64 = 16.0 / 135.0;
const D3: f64 = 6656.0 / 12825.0;
const D4: f64 = 28561.0 / 56430.0;
const D5: f64 = -9.0 / 50.0;
const D6: f64 = 2.0 / 55.0;

/// Advance one point by one RKF4(5) step of `dP/dt = V(P)`.
///
/// Returns the 5th-order position estimate together with the local
/// error estimate (Euclidean distance between the embedded 4th- and
/// 5th-order estimates). Returns `None` when any of the six stage
/// points samples an undefined velocity: the point has left the grid
/// (or entered missing data), and the caller should terminate the
/// trajectory there.
pub fn rkf45_step(field: &VelocityField, point: Point, dt: f64) -> Option<(Point, f64)> {
    rkf45_step_signed(field, point, dt, 1.0)
}

/// RKF4(5) step with a sign applied to the sampled velocity, so
/// backward-in-time integration reuses the same stage arithmetic.
pub(crate) fn rkf45_step_signed(
    field: &VelocityField,
    point: Point,
    dt: f64,
    sign: f64,
) -> Option<(Point, f64)> {
    let v = |x: f64, y: f64| -> Option<(f64, f64)> {
        let v = field.velocity_at(Point::new(x, y))?;
        Some((sign * v.x, sign * v.y))
    };

    let (k1x, k1y) = v(point.x, point.y)?;
    let (k2x, k2y) = v(point.x + dt * B21 * k1x, point.y + dt * B21 * k1y)?;
    let (k3x, k3y) = v(
        point.x + dt * (B31 * k1x + B32 * k2x),
        point.y + dt * (B31 * k1y + B32 * k2y),
    )?;
    let (k4x, k4y) = v(
        point.x + dt * (B41 * k1x + B42 * k2x + B43 * k3x),
        point.y + dt * (B41 * k1y + B42 * k2y + B43 * k3y),
    )?;
    let (k5x, k5y) = v(
        point.x + dt * (B51 * k1x + B52 * k2x + B53 * k3x + B54 * k4x),
        point.y + dt * (B51 * k1y + B52 * k2y + B53 * k3y + B54 * k4y),
    )?;
    let (k6x, k6y) = v(
        point.x + dt * (B61 * k1x + B62 * k2x + B63 * k3x + B64 * k4x + B65 * k5x),
        point.y + dt * (B61 * k1y + B62 * k2y + B63 * k3y + B64 * k4y + B65 * k5y),
    )?;

    let x4 = point.x + dt * (C1 * k1x + C3 * k3x + C4 * k4x + C5 * k5x);
    let y4 = point.y + dt * (C1 * k1y + C3 * k3y + C4 * k4y + C5 * k5y);

    let x5 = point.x + dt * (D1 * k1x + D3 * k3x + D4 * k4x + D5 * k5x + D6 * k6x);
    let y5 = point.y + dt * (D1 * k1y + D3 * k3y + D4 * k4y + D5 * k5y + D6 * k6y);

    let next = Point::new(x5, y5);
    let error_estimate = Point::new(x4, y4).distance(&next);
    Some((next, error_estimate))
}
