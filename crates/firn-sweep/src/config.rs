//! Sweep pool configuration.

/// Configuration for [`run_sweep`](crate::pool::run_sweep).
///
/// Controls only the worker pool size; the numerical parameters of a
/// sweep travel with the provider, source and integration parameters.
#[derive(Clone, Debug, Default)]
pub struct SweepConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[2, 16]`).
    pub worker_count: Option<usize>,
}

impl SweepConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`; zero workers would
    /// leave the task channel with no consumers.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(4);
                (cpus / 2).clamp(2, 16)
            }
        }
    }
}
