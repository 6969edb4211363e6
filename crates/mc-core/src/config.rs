//! Run configuration shared by the driver, the engine and the pool.
//!
//! `RunConfig` is a plain value type.  Applications build it in code, load it
//! with serde (behind the `serde` feature), or overlay environment variables
//! on the defaults with [`RunConfig::from_env`].
//!
//! Degenerate values (`num_threads = Some(0)`, `chunk_size = 0`) are accepted
//! here and corrected by the component that consumes them; only values that
//! cannot be parsed at all are errors.

use crate::{McError, McResult};

/// Environment variable overriding [`RunConfig::seed`].
pub const ENV_SEED: &str = "MC_SEED";
/// Environment variable overriding [`RunConfig::num_threads`].
pub const ENV_NUM_THREADS: &str = "MC_NUM_THREADS";
/// Environment variable overriding [`RunConfig::chunk_size`].
pub const ENV_CHUNK_SIZE: &str = "MC_CHUNK_SIZE";

// ── RunConfig ─────────────────────────────────────────────────────────────────

/// Top-level configuration for one simulation run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Seed for the random engine.  `None` resets to the engine's default
    /// seed.  The same seed always reproduces the same value sequence.
    pub seed: Option<u32>,

    /// Worker thread count.  `None` uses the host-reported concurrency.
    pub num_threads: Option<usize>,

    /// Consecutive indices a worker claims at a time from a batch range.
    pub chunk_size: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed:        None,
            num_threads: None,
            chunk_size:  1,
        }
    }
}

impl RunConfig {
    /// Default configuration with an explicit seed.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed: Some(seed), ..Self::default() }
    }

    /// Builder-style thread count override.
    pub fn threads(mut self, n: usize) -> Self {
        self.num_threads = Some(n);
        self
    }

    /// Builder-style chunk size override.
    pub fn chunk(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    /// Overlay `MC_SEED`, `MC_NUM_THREADS` and `MC_CHUNK_SIZE` on the defaults.
    pub fn from_env() -> McResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`][Self::from_env] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> McResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SEED) {
            config.seed = Some(parse_setting(ENV_SEED, &raw)?);
        }
        if let Some(raw) = lookup(ENV_NUM_THREADS) {
            config.num_threads = Some(parse_setting(ENV_NUM_THREADS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_CHUNK_SIZE) {
            config.chunk_size = parse_setting(ENV_CHUNK_SIZE, &raw)?;
        }

        Ok(config)
    }

    /// Thread count with `Some(0)` folded into "use the host default".
    #[inline]
    pub fn effective_threads(&self) -> Option<usize> {
        self.num_threads.filter(|&n| n > 0)
    }

    /// Chunk size with `0` folded into `1`.
    #[inline]
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}

fn parse_setting<T>(key: &'static str, raw: &str) -> McResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| McError::InvalidSetting {
        key,
        value:  raw.to_string(),
        reason: e.to_string(),
    })
}
