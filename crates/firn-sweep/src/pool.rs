//! The sweep worker pool.

use crossbeam_channel::{Receiver, Sender};

use firn_core::PerturbationSample;
use firn_trajectory::{
    compute_perturbation, FeatureSource, TrajectoryParams, TrajectoryTable, VelocityProvider,
};

use crate::config::SweepConfig;
use crate::error::SweepError;

/// A task dispatched to a sweep worker: one perturbation draw.
struct SweepTask {
    index: usize,
    sample: PerturbationSample,
}

/// Outcome of one draw, tagged with its perturbation index.
type SweepOutcome = (usize, Result<TrajectoryTable, firn_trajectory::TrajectoryError>);

/// Run one [`compute_perturbation`] call per sample over a worker pool.
///
/// Workers receive tasks over a crossbeam channel and run each draw to
/// completion; no draw suspends or shares state with another. The
/// provider and source are shared read-only; each worker calls
/// `source.load()` itself, so feature-dataset handles are opened per
/// worker rather than shared across threads.
///
/// Results are returned in perturbation order (`samples[i]` produced
/// `tables[i]`), independent of worker scheduling.
///
/// # Errors
///
/// Returns [`SweepError::InvalidParams`] before spawning anything if
/// the shared parameters are invalid, and
/// [`SweepError::PerturbationFailed`] if any draw fails; when several
/// fail, the lowest index is reported so repeated runs surface the
/// same error.
pub fn run_sweep(
    provider: &dyn VelocityProvider,
    source: &dyn FeatureSource,
    samples: &[PerturbationSample],
    params: &TrajectoryParams,
    config: &SweepConfig,
) -> Result<Vec<TrajectoryTable>, SweepError> {
    params
        .validate()
        .map_err(|source| SweepError::InvalidParams { source })?;
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let worker_count = config.resolved_worker_count().min(samples.len());

    let (task_tx, task_rx) = crossbeam_channel::unbounded::<SweepTask>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<SweepOutcome>();

    for (index, &sample) in samples.iter().enumerate() {
        // The channel is unbounded and both ends are alive.
        let _ = task_tx.send(SweepTask { index, sample });
    }
    drop(task_tx);

    std::thread::scope(|scope| {
        for _ in 0..worker_count {
            let task_rx: Receiver<SweepTask> = task_rx.clone();
            let result_tx: Sender<SweepOutcome> = result_tx.clone();
            scope.spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let outcome =
                        compute_perturbation(provider, source, task.index, task.sample, params);
                    if result_tx.send((task.index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        let mut done: Vec<(usize, TrajectoryTable)> = Vec::with_capacity(samples.len());
        let mut failure: Option<SweepError> = None;
        while let Ok((index, outcome)) = result_rx.recv() {
            match outcome {
                Ok(table) => done.push((index, table)),
                Err(source) => {
                    let keep_previous = matches!(
                        &failure,
                        Some(SweepError::PerturbationFailed { index: prev, .. }) if *prev < index
                    );
                    if !keep_previous {
                        failure = Some(SweepError::PerturbationFailed { index, source });
                    }
                }
            }
        }

        if let Some(err) = failure {
            return Err(err);
        }
        done.sort_by_key(|&(index, _)| index);
        Ok(done.into_iter().map(|(_, table)| table).collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use firn_core::Point;
    use firn_grid::VelocityField;
    use firn_trajectory::TrajectoryError;

    /// Provider whose configured indices fail; others yield a field.
    struct FlakyProvider {
        inner: firn_trajectory::EnvelopeProvider,
        fail_on: Vec<f64>,
    }

    impl VelocityProvider for FlakyProvider {
        fn velocity_field(
            &self,
            sample: PerturbationSample,
        ) -> Result<VelocityField, TrajectoryError> {
            if self.fail_on.contains(&sample.sx()) {
                return Err(TrajectoryError::Source {
                    reason: format!("provider failure at sx={}", sample.sx()),
                });
            }
            self.inner.velocity_field(sample)
        }
    }

    fn provider() -> firn_trajectory::EnvelopeProvider {
        firn_trajectory::EnvelopeProvider::new(
            firn_test_utils::uniform_field(11, 1.0, 0.0),
            firn_test_utils::uniform_field(11, 0.1, 0.0),
            1.0,
        )
        .unwrap()
    }

    fn source() -> firn_test_utils::MemoryFeatureSource {
        firn_test_utils::MemoryFeatureSource::new(vec![firn_test_utils::named_feature(
            "seed",
            &[(1.0, 5.0)],
        )])
    }

    fn samples(n: usize) -> Vec<PerturbationSample> {
        (0..n)
            .map(|i| PerturbationSample::new(i as f64 / (n - 1) as f64, 0.5).unwrap())
            .collect()
    }

    #[test]
    fn empty_sample_list_is_an_empty_sweep() {
        let tables = run_sweep(
            &provider(),
            &source(),
            &[],
            &TrajectoryParams::default(),
            &SweepConfig::default(),
        )
        .unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn invalid_params_fail_before_spawning() {
        let params = TrajectoryParams {
            dt: -1.0,
            ..Default::default()
        };
        let err = run_sweep(
            &provider(),
            &source(),
            &samples(3),
            &params,
            &SweepConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SweepError::InvalidParams { .. }));
    }

    #[test]
    fn lowest_failing_index_is_reported() {
        let flaky = FlakyProvider {
            inner: provider(),
            // samples(5) has sx = 0, 0.25, 0.5, 0.75, 1; fail two.
            fail_on: vec![0.75, 0.25],
        };
        let err = run_sweep(
            &flaky,
            &source(),
            &samples(5),
            &TrajectoryParams {
                dt: 1.0,
                total_time: 2.0,
                reverse: false,
            },
            &SweepConfig {
                worker_count: Some(4),
            },
        )
        .unwrap_err();
        match err {
            SweepError::PerturbationFailed { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
