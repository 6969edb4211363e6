//! `mc-pool` — fixed-size worker pool with a caller-blocking batch barrier.
//!
//! # Batch protocol
//!
//! ```text
//! commit_range_step_jobs_and_wait(begin, end, job):
//!   ① Dispatch — every worker starts claiming chunks of `chunk_size`
//!                consecutive indices from a shared cursor over [begin, end).
//!   ② Run      — job(worker_id, index) once per index; errors and panics
//!                are captured per index, siblings keep running.
//!   ③ Barrier  — the caller is released only after every worker has
//!                drained the cursor; all job side effects are visible.
//!   ④ Report   — Ok(BatchSummary), or PoolError::Batch with every failure.
//! ```
//!
//! Each index is visited exactly once.  Which worker visits it, and in what
//! order relative to other indices, is unspecified.
//!
//! # Quick-start
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use mc_pool::WorkerPool;
//!
//! let pool = WorkerPool::create(Some(4)).unwrap();
//! let sum = AtomicUsize::new(0);
//! pool.commit_range_step_jobs_and_wait(0, 100, |_worker, i| {
//!     sum.fetch_add(i, Ordering::Relaxed);
//! })
//! .unwrap();
//! assert_eq!(sum.into_inner(), 4950);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod pool;


pub use builder::PoolBuilder;
pub use error::{BatchFailure, FailureKind, JobError, JobFailure, JobResult, PoolError, PoolResult};
pub use observer::{BatchObserver, NoopObserver};
pub use pool::{BatchSummary, WorkerPool};
