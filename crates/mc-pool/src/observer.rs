//! Batch observer trait for progress reporting and data collection.

use std::ops::Range;

use mc_core::BatchId;

use crate::BatchSummary;

/// Callbacks invoked on the submitting thread around each batch.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl BatchObserver for Progress {
///     fn on_batch_end(&mut self, summary: &BatchSummary) {
///         println!("{}: {} jobs in {:?}", summary.batch, summary.visited, summary.elapsed);
///     }
/// }
/// ```
pub trait BatchObserver {
    /// Called before any job of the batch runs.
    fn on_batch_start(&mut self, _batch: BatchId, _range: Range<usize>, _workers: usize) {}

    /// Called after the barrier, whether or not any job failed.
    fn on_batch_end(&mut self, _summary: &BatchSummary) {}
}

/// A [`BatchObserver`] that does nothing.
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}
