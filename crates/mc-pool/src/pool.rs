//! The `WorkerPool` struct and its batch dispatch.

use std::any::Any;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use mc_core::{BatchId, WorkerId};
use tracing::{debug, warn};

use crate::{
    BatchFailure, BatchObserver, FailureKind, JobFailure, JobResult, NoopObserver, PoolBuilder,
    PoolError, PoolResult,
};

// ── BatchSummary ──────────────────────────────────────────────────────────────

/// What one batch did, available once the barrier has been passed.
#[derive(Clone, Debug)]
pub struct BatchSummary {
    pub batch:      BatchId,
    /// The submitted range (empty if `end <= begin`).
    pub range:      Range<usize>,
    /// Job invocations made; always `range.len()`.
    pub visited:    usize,
    /// Invocations that returned an error or panicked.
    pub failed:     usize,
    /// Invocations per worker, indexed by `WorkerId`.
    pub per_worker: Vec<usize>,
    pub elapsed:    Duration,
}

// ── WorkerPool ────────────────────────────────────────────────────────────────

/// A fixed set of worker threads that run index-range batches to completion.
///
/// Workers are created once and reused by every batch.  Batches are flat: a
/// job body must not submit to the pool that is running it (that returns
/// [`PoolError::Reentrant`]).
///
/// Create via [`WorkerPool::create`] or [`PoolBuilder`].
pub struct WorkerPool {
    /// `None` after [`shutdown`][Self::shutdown].
    pub(crate) threads:    Option<rayon::ThreadPool>,
    pub(crate) workers:    usize,
    pub(crate) chunk_size: usize,
    pub(crate) next_batch: AtomicU64,
}

impl WorkerPool {
    /// Pool with `worker_count` workers, or the host-reported concurrency for
    /// `None`.  `Some(0)` is treated like `None`.
    pub fn create(worker_count: Option<usize>) -> PoolResult<WorkerPool> {
        let mut builder = PoolBuilder::new();
        if let Some(n) = worker_count {
            builder = builder.workers(n);
        }
        builder.build()
    }

    /// Number of workers; every `WorkerId` handed to a job is below this.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Consecutive indices a worker claims at a time.
    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// `true` once [`shutdown`][Self::shutdown] has been called.
    pub fn is_shut_down(&self) -> bool {
        self.threads.is_none()
    }

    /// Retire the worker threads.  Later batches fail with
    /// [`PoolError::ShutDown`].  Dropping the pool does the same.
    pub fn shutdown(&mut self) {
        if self.threads.take().is_some() {
            debug!(workers = self.workers, "worker pool shut down");
        }
    }

    // ── Batch API ─────────────────────────────────────────────────────────

    /// Run `job(worker, index)` once for every index in `[begin, end)` and
    /// block until all of them have returned.
    ///
    /// A panicking job is recorded as a failure; the remaining jobs still run
    /// and the batch reports [`PoolError::Batch`] after the barrier.
    pub fn commit_range_step_jobs_and_wait<F>(
        &self,
        begin: usize,
        end:   usize,
        job:   F,
    ) -> PoolResult<BatchSummary>
    where
        F: Fn(WorkerId, usize) + Sync,
    {
        self.dispatch(begin, end, |worker, index| {
            job(worker, index);
            Ok(())
        }, &mut NoopObserver)
    }

    /// Like [`commit_range_step_jobs_and_wait`][Self::commit_range_step_jobs_and_wait]
    /// for job bodies that report failure through [`JobResult`].
    pub fn try_commit_range_step_jobs_and_wait<F>(
        &self,
        begin: usize,
        end:   usize,
        job:   F,
    ) -> PoolResult<BatchSummary>
    where
        F: Fn(WorkerId, usize) -> JobResult + Sync,
    {
        self.dispatch(begin, end, job, &mut NoopObserver)
    }

    /// Fallible batch with observer callbacks around it.
    pub fn commit_observed<F, O>(
        &self,
        begin:    usize,
        end:      usize,
        job:      F,
        observer: &mut O,
    ) -> PoolResult<BatchSummary>
    where
        F: Fn(WorkerId, usize) -> JobResult + Sync,
        O: BatchObserver + ?Sized,
    {
        self.dispatch(begin, end, job, observer)
    }

    // ── Core dispatch ─────────────────────────────────────────────────────

    fn dispatch<F, O>(
        &self,
        begin:    usize,
        end:      usize,
        job:      F,
        observer: &mut O,
    ) -> PoolResult<BatchSummary>
    where
        F: Fn(WorkerId, usize) -> JobResult + Sync,
        O: BatchObserver + ?Sized,
    {
        let threads = self.threads.as_ref().ok_or(PoolError::ShutDown)?;
        if threads.current_thread_index().is_some() {
            return Err(PoolError::Reentrant);
        }

        let batch = BatchId(self.next_batch.fetch_add(1, Ordering::Relaxed));
        let range = begin..end.max(begin);
        let len = range.len();
        let chunk = self.chunk_size;

        observer.on_batch_start(batch, range.clone(), self.workers);
        debug!(%batch, begin, end = range.end, workers = self.workers, "batch dispatched");
        let started = Instant::now();

        // Offsets into `range` rather than absolute indices so the cursor
        // cannot wrap when `end` is near `usize::MAX`.
        let cursor = AtomicUsize::new(0);
        let failures: Mutex<Vec<JobFailure>> = Mutex::new(Vec::new());

        // `broadcast` runs the closure once on every worker and returns only
        // after all of them have finished: this is the batch barrier.
        let per_worker: Vec<usize> = threads.broadcast(|ctx| {
            let worker = WorkerId(ctx.index() as u32);
            let mut done = 0usize;
            loop {
                let offset = cursor.fetch_add(chunk, Ordering::Relaxed);
                if offset >= len {
                    break;
                }
                let stop = offset + chunk.min(len - offset);
                for index in range.start + offset..range.start + stop {
                    done += 1;
                    if let Err(kind) = run_job(&job, worker, index) {
                        failures
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(JobFailure { worker, index, kind });
                    }
                }
            }
            done
        });

        let mut failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
        failures.sort_by_key(|f| f.index);

        let summary = BatchSummary {
            batch,
            visited: per_worker.iter().sum(),
            failed: failures.len(),
            per_worker,
            elapsed: started.elapsed(),
            range,
        };
        debug_assert_eq!(summary.visited, len);
        observer.on_batch_end(&summary);

        if failures.is_empty() {
            debug!(%batch, jobs = summary.visited, elapsed = ?summary.elapsed, "batch complete");
            Ok(summary)
        } else {
            warn!(%batch, failed = failures.len(), jobs = summary.visited, "batch finished with failures");
            Err(PoolError::Batch(BatchFailure { summary, failures }))
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("chunk_size", &self.chunk_size)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

/// Run one job, turning an error return or a panic into a [`FailureKind`].
fn run_job<F>(job: &F, worker: WorkerId, index: usize) -> Result<(), FailureKind>
where
    F: Fn(WorkerId, usize) -> JobResult,
{
    match panic::catch_unwind(AssertUnwindSafe(|| job(worker, index))) {
        Ok(Ok(()))   => Ok(()),
        Ok(Err(e))   => Err(FailureKind::Error(e)),
        Err(payload) => Err(FailureKind::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
