//! pi — smallest end-to-end demo of the mc Monte-Carlo runtime.
//!
//! Estimates pi by throwing uniform points at the unit square, then checks the
//! first two moments of the Gaussian stream.  Settings come from `MC_SEED`,
//! `MC_NUM_THREADS` and `MC_CHUNK_SIZE`; logging from `RUST_LOG`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mc_driver::DriverBuilder;
use mc_pool::{BatchObserver, BatchSummary};

// ── Constants ─────────────────────────────────────────────────────────────────

const BATCHES:          usize = 8;
const POINTS_PER_BATCH: usize = 250_000;
const GAUSSIAN_SAMPLES: usize = 200_000;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Accumulates per-worker job counts over every batch.
#[derive(Default)]
struct WorkerTally {
    batches:    usize,
    per_worker: Vec<usize>,
}

impl BatchObserver for WorkerTally {
    fn on_batch_end(&mut self, summary: &BatchSummary) {
        self.batches += 1;
        if self.per_worker.len() < summary.per_worker.len() {
            self.per_worker.resize(summary.per_worker.len(), 0);
        }
        for (total, n) in self.per_worker.iter_mut().zip(&summary.per_worker) {
            *total += n;
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let driver = DriverBuilder::from_env()?.build()?;
    let seed = driver.engine().seed();

    println!("=== pi — mc Monte-Carlo runtime ===");
    println!(
        "Seed: {seed}  |  Workers: {}  |  Chunk: {}",
        driver.pool().worker_count(),
        driver.pool().chunk_size()
    );
    println!();

    // 1. Pi from the hit ratio of the quarter circle.
    let hits = AtomicU64::new(0);
    let mut tally = WorkerTally::default();
    let t0 = Instant::now();
    for _ in 0..BATCHES {
        driver.run(0, POINTS_PER_BATCH, |rng, _, _| {
            let x = rng.uniform();
            let y = rng.uniform();
            if x * x + y * y <= 1.0 {
                hits.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        }, &mut tally)?;
    }
    let elapsed = t0.elapsed();

    let thrown = (BATCHES * POINTS_PER_BATCH) as f64;
    let estimate = 4.0 * hits.into_inner() as f64 / thrown;
    info!(estimate, batches = tally.batches, "pi estimated");

    println!("Points thrown : {thrown}");
    println!("Pi estimate   : {estimate:.6}  (error {:+.6})", estimate - std::f64::consts::PI);
    println!("Elapsed       : {:.3} s", elapsed.as_secs_f64());
    println!();

    // 2. Gaussian moments.
    let draws = driver.sample(GAUSSIAN_SAMPLES, |rng, _, _| rng.gaussian() as f64)?;
    let n = draws.len() as f64;
    let mean = draws.iter().sum::<f64>() / n;
    let variance = draws.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    println!("Gaussian mean     : {mean:+.5}");
    println!("Gaussian variance : {variance:.5}");
    println!("Engine advances   : {}", driver.engine().advances());
    println!();

    // 3. Work distribution.
    println!("{:<10} {:>12}", "Worker", "Jobs");
    println!("{}", "-".repeat(23));
    for (worker, jobs) in tally.per_worker.iter().enumerate() {
        println!("{:<10} {:>12}", worker, jobs);
    }

    Ok(())
}
