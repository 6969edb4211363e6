//! Fluent builder for constructing a [`WorkerPool`].

use std::sync::atomic::AtomicU64;

use mc_core::RunConfig;
use tracing::{debug, warn};

use crate::{PoolResult, WorkerPool};

/// Fluent builder for [`WorkerPool`].
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.workers(n)`          | Host-reported concurrency        |
/// | `.chunk_size(n)`       | 1                                |
/// | `.thread_name(prefix)` | `"mc-worker"` → `mc-worker-0`, … |
///
/// Zero values for `workers` or `chunk_size` are corrected to the default
/// with a warning rather than rejected.
///
/// # Example
///
/// ```rust,ignore
/// let pool = PoolBuilder::new()
///     .workers(8)
///     .chunk_size(64)
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct PoolBuilder {
    workers:     Option<usize>,
    chunk_size:  usize,
    thread_name: String,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self {
            workers:     None,
            chunk_size:  1,
            thread_name: "mc-worker".to_string(),
        }
    }
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Thread count and chunk size taken from a [`RunConfig`].
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            workers:    config.num_threads,
            chunk_size: config.chunk_size,
            ..Self::default()
        }
    }

    /// Fixed number of worker threads.
    pub fn workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    /// Consecutive indices a worker claims from the batch cursor at a time.
    ///
    /// Larger chunks cut cursor contention for very cheap jobs at the cost of
    /// coarser load balancing.
    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    /// Prefix for worker thread names; the worker index is appended.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = prefix.into();
        self
    }

    /// Start the worker threads.
    pub fn build(self) -> PoolResult<WorkerPool> {
        let requested = RunConfig {
            num_threads: self.workers,
            chunk_size:  self.chunk_size,
            ..RunConfig::default()
        };
        let workers = requested.effective_threads();
        let chunk_size = requested.effective_chunk_size();
        if workers != requested.num_threads {
            warn!("worker count 0 requested; using host concurrency");
        }
        if chunk_size != requested.chunk_size {
            warn!("chunk size 0 requested; using 1");
        }

        let prefix = self.thread_name;
        let mut threads = rayon::ThreadPoolBuilder::new()
            .thread_name(move |i| format!("{prefix}-{i}"));
        if let Some(n) = workers {
            threads = threads.num_threads(n);
        }
        let threads = threads.build()?;
        let workers = threads.current_num_threads();

        debug!(workers, chunk_size, "worker pool started");

        Ok(WorkerPool {
            threads: Some(threads),
            workers,
            chunk_size,
            next_batch: AtomicU64::new(0),
        })
    }
}
