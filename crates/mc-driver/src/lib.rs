//! `mc-driver` — runs seeded Monte-Carlo batches.
//!
//! The driver is the only `mc-*` crate that knows both halves of the runtime:
//! it reseeds the [`RandomEngine`][mc_rng::RandomEngine] from the run
//! configuration, owns a [`WorkerPool`][mc_pool::WorkerPool], and hands job
//! bodies a reference to the engine alongside the worker id and index.
//!
//! # Quick-start
//!
//! ```rust
//! use mc_core::RunConfig;
//! use mc_driver::DriverBuilder;
//!
//! let driver = DriverBuilder::new(RunConfig::with_seed(7).threads(2))
//!     .owned_engine()
//!     .build()
//!     .unwrap();
//! let draws = driver.sample(16, |rng, _worker, _i| rng.uniform()).unwrap();
//! assert_eq!(draws.len(), 16);
//! ```

pub mod builder;
pub mod driver;
pub mod error;


pub use builder::DriverBuilder;
pub use driver::Driver;
pub use error::{DriverError, DriverResult};
