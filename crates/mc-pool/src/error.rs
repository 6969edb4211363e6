use std::fmt;

use mc_core::WorkerId;
use thiserror::Error;

use crate::BatchSummary;

/// Error type a fallible job body reports through.
pub type JobError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type of a fallible job body.
pub type JobResult = Result<(), JobError>;

/// How a single job invocation failed.
#[derive(Debug, Error)]
pub enum FailureKind {
    #[error("{0}")]
    Error(JobError),

    #[error("panicked: {0}")]
    Panic(String),
}

/// One failed job invocation.
#[derive(Debug, Error)]
#[error("job {index} on {worker} failed: {kind}")]
pub struct JobFailure {
    pub worker: WorkerId,
    pub index:  usize,
    pub kind:   FailureKind,
}

/// Every failure of one batch, reported after the barrier.
///
/// Jobs that succeeded are not rolled back; their side effects stay in
/// caller-owned buffers and the caller decides whether they are usable.
#[derive(Debug)]
pub struct BatchFailure {
    pub summary:  BatchSummary,
    /// Sorted by index.
    pub failures: Vec<JobFailure>,
}

impl BatchFailure {
    /// The failure with the lowest index.
    pub fn first(&self) -> Option<&JobFailure> {
        self.failures.first()
    }
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} jobs failed",
            self.summary.batch,
            self.failures.len(),
            self.summary.visited,
        )?;
        if let Some(first) = self.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchFailure {}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to start worker threads: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),

    #[error("worker pool has been shut down")]
    ShutDown,

    #[error("batch submitted from one of the pool's own workers")]
    Reentrant,

    #[error(transparent)]
    Batch(#[from] BatchFailure),
}

pub type PoolResult<T> = Result<T, PoolError>;
