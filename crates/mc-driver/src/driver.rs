//! The `Driver` struct and its batch helpers.

use std::sync::{Mutex, PoisonError};

use mc_core::{RunConfig, WorkerId};
use mc_pool::{BatchObserver, BatchSummary, JobError, JobResult, NoopObserver, WorkerPool};
use mc_rng::RandomEngine;

use crate::DriverResult;

/// Which engine the driver draws from.
pub(crate) enum EngineSource {
    Global(&'static RandomEngine),
    Owned(RandomEngine),
}

impl EngineSource {
    #[inline]
    fn get(&self) -> &RandomEngine {
        match self {
            EngineSource::Global(engine) => *engine,
            EngineSource::Owned(engine)  => engine,
        }
    }
}

/// Runs seeded batches: one engine, one pool, one configuration.
///
/// Every batch helper blocks until the whole batch has retired, so values
/// written by job bodies can be read as soon as the call returns.
///
/// Create via [`DriverBuilder`][crate::DriverBuilder].
pub struct Driver {
    pub(crate) config: RunConfig,
    pub(crate) engine: EngineSource,
    pub(crate) pool:   WorkerPool,
}

impl Driver {
    /// Driver on the process-wide engine with default builder settings.
    pub fn new(config: RunConfig) -> DriverResult<Driver> {
        crate::DriverBuilder::new(config).build()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn engine(&self) -> &RandomEngine {
        self.engine.get()
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Reseed the engine from the configuration so the next batch starts at
    /// the beginning of the canonical sequence.
    ///
    /// Must not be called while another thread is drawing from the same
    /// engine if the run is expected to be reproducible.
    pub fn restart(&self) {
        match self.config.seed {
            Some(seed) => self.engine().reseed(seed),
            None       => self.engine().reset(),
        }
    }

    // ── Batch helpers ─────────────────────────────────────────────────────

    /// Evaluate `f(engine, worker, index)` for every index in `0..n` and
    /// return the results ordered by index.
    pub fn sample<T, F>(&self, n: usize, f: F) -> DriverResult<Vec<T>>
    where
        T: Send,
        F: Fn(&RandomEngine, WorkerId, usize) -> T + Sync,
    {
        let mut out: Vec<Option<T>> = (0..n).map(|_| None).collect();
        self.fill(&mut out, |rng, worker, i| Ok(Some(f(rng, worker, i))))?;

        debug_assert!(out.iter().all(Option::is_some));
        Ok(out.into_iter().flatten().collect())
    }

    /// Write `f(engine, worker, index)` into `out[index]` for every slot.
    ///
    /// If any body fails, the batch still runs to completion and every slot
    /// whose body succeeded keeps its new value; the failure is returned
    /// afterwards.
    pub fn fill<T, F>(&self, out: &mut [T], f: F) -> DriverResult<BatchSummary>
    where
        T: Send,
        F: Fn(&RandomEngine, WorkerId, usize) -> Result<T, JobError> + Sync,
    {
        let engine = self.engine();
        let slots: Vec<Mutex<&mut T>> = out.iter_mut().map(Mutex::new).collect();

        let summary = self.pool.try_commit_range_step_jobs_and_wait(0, slots.len(), |worker, i| {
            let value = f(engine, worker, i)?;
            let mut slot = slots[i].lock().unwrap_or_else(PoisonError::into_inner);
            **slot = value;
            Ok(())
        })?;
        Ok(summary)
    }

    /// Raw batch over `[begin, end)` with engine access and observer hooks.
    pub fn run<F, O>(
        &self,
        begin:    usize,
        end:      usize,
        job:      F,
        observer: &mut O,
    ) -> DriverResult<BatchSummary>
    where
        F: Fn(&RandomEngine, WorkerId, usize) -> JobResult + Sync,
        O: BatchObserver + ?Sized,
    {
        let engine = self.engine();
        let summary = self
            .pool
            .commit_observed(begin, end, |worker, i| job(engine, worker, i), observer)?;
        Ok(summary)
    }

    /// [`run`][Self::run] without an observer.
    pub fn run_quiet<F>(&self, begin: usize, end: usize, job: F) -> DriverResult<BatchSummary>
    where
        F: Fn(&RandomEngine, WorkerId, usize) -> JobResult + Sync,
    {
        self.run(begin, end, job, &mut NoopObserver)
    }
}
