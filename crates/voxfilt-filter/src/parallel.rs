use crate::error::FilterError;

/// Volumes with at least this many voxels run in parallel under [`ExecutionStrategy::Auto`].
pub const AUTO_PARALLEL_MIN_VOXELS: usize = 100_000;

/// Controls how a convolution pass is executed.
///
/// Every output voxel of a pass depends only on the source volume, so all strategies produce
/// bit-identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run in parallel for volumes of at least [`AUTO_PARALLEL_MIN_VOXELS`], serially otherwise.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small volumes, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool, one task per Z slice.
    Parallel,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether a pass over `num_voxels` voxels should be split across threads.
    pub fn is_parallel(&self, num_voxels: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => num_voxels >= AUTO_PARALLEL_MIN_VOXELS,
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
        }
    }

    /// Run `op` in the thread pool selected by the strategy.
    ///
    /// Only [`ExecutionStrategy::Fixed`] builds a dedicated pool; the other strategies run `op`
    /// on the current thread, which uses the global Rayon pool for parallel work.
    ///
    /// # Errors
    ///
    /// If the thread count is zero or the pool fails to build, an error is returned and `op`
    /// is not run.
    pub fn install<R, F>(&self, op: F) -> Result<R, FilterError>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        match *self {
            ExecutionStrategy::Fixed(n) => {
                if n == 0 {
                    return Err(FilterError::InvalidThreadCount(n));
                }
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| FilterError::ThreadPool(e.to_string()))?;
                Ok(pool.install(op))
            }
            _ => Ok(op()),
        }
    }
}
