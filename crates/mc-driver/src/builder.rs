//! Fluent builder for constructing a [`Driver`].

use mc_core::RunConfig;
use mc_pool::PoolBuilder;
use mc_rng::RandomEngine;
use tracing::info;

use crate::driver::EngineSource;
use crate::{Driver, DriverResult};

/// Fluent builder for [`Driver`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                               |
/// |--------------------------|---------------------------------------|
/// | `.owned_engine()`        | The process-wide `RandomEngine`       |
/// | `.thread_name(prefix)`   | `"mc-worker"`                         |
///
/// # Example
///
/// ```rust,ignore
/// let driver = DriverBuilder::from_env()?
///     .thread_name("tracer")
///     .build()?;
/// ```
pub struct DriverBuilder {
    config:      RunConfig,
    owned:       bool,
    thread_name: Option<String>,
}

impl DriverBuilder {
    pub fn new(config: RunConfig) -> Self {
        Self { config, owned: false, thread_name: None }
    }

    /// Builder over [`RunConfig::from_env`].
    pub fn from_env() -> DriverResult<Self> {
        Ok(Self::new(RunConfig::from_env()?))
    }

    /// Builder over [`RunConfig::from_lookup`].
    pub fn from_lookup<F>(lookup: F) -> DriverResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self::new(RunConfig::from_lookup(lookup)?))
    }

    /// Give the driver its own engine instead of the process-wide one.
    ///
    /// Draws then never interleave with other users of
    /// [`RandomEngine::instance`].
    pub fn owned_engine(mut self) -> Self {
        self.owned = true;
        self
    }

    /// Prefix for worker thread names.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name = Some(prefix.into());
        self
    }

    /// Start the pool and reseed the engine from the configuration.
    pub fn build(self) -> DriverResult<Driver> {
        let mut pool = PoolBuilder::from_config(&self.config);
        if let Some(prefix) = self.thread_name {
            pool = pool.thread_name(prefix);
        }
        let pool = pool.build()?;

        let engine = if self.owned {
            EngineSource::Owned(RandomEngine::default())
        } else {
            EngineSource::Global(RandomEngine::instance())
        };

        let driver = Driver { config: self.config, engine, pool };
        driver.restart();

        info!(
            seed = driver.engine().seed(),
            workers = driver.pool.worker_count(),
            owned_engine = self.owned,
            "driver ready"
        );
        Ok(driver)
    }
}
