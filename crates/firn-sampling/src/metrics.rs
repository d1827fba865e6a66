//! Skill metrics for comparing simulated and observed fields.

use firn_grid::Grid2;

use crate::error::SampleError;

/// NaN-skipping root mean square error between two fields.
///
/// Only cells where both fields are defined contribute; missing cells
/// on either side are excluded from the mean rather than propagated.
///
/// # Errors
///
/// Returns [`SampleError::ShapeMismatch`] if the fields are not on the
/// same grid, and [`SampleError::NoValidCells`] if no cell is defined
/// in both.
pub fn rmse(simulated: &Grid2, observed: &Grid2) -> Result<f64, SampleError> {
    if simulated.shape() != observed.shape() {
        return Err(SampleError::ShapeMismatch {
            expected: observed.shape(),
            found: simulated.shape(),
        });
    }
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for (&s, &o) in simulated.data().iter().zip(observed.data()) {
        let d = s - o;
        if !d.is_nan() {
            sum_sq += d * d;
            count += 1;
        }
    }
    if count == 0 {
        return Err(SampleError::NoValidCells);
    }
    Ok((sum_sq / count as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_fields_have_zero_rmse() {
        let g = Grid2::filled(3, 3, 42.0);
        assert_eq!(rmse(&g, &g).unwrap(), 0.0);
    }

    #[test]
    fn constant_offset() {
        let a = Grid2::filled(2, 2, 3.0);
        let b = Grid2::filled(2, 2, 0.0);
        assert_eq!(rmse(&a, &b).unwrap(), 3.0);
    }

    #[test]
    fn missing_cells_are_skipped() {
        let mut a = Grid2::filled(2, 2, 1.0);
        a.set(0, 0, f64::NAN);
        let b = Grid2::filled(2, 2, 0.0);
        assert_eq!(rmse(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn all_missing_is_an_error() {
        let a = Grid2::filled(2, 2, f64::NAN);
        let b = Grid2::filled(2, 2, 0.0);
        assert_eq!(rmse(&a, &b).unwrap_err(), SampleError::NoValidCells);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = Grid2::filled(2, 3, 0.0);
        let b = Grid2::filled(3, 2, 0.0);
        assert!(matches!(
            rmse(&a, &b),
            Err(SampleError::ShapeMismatch { .. })
        ));
    }
}
