//! Framework error type.
//!
//! Sub-crates define their own error enums (`PoolError`, `DriverError`) and
//! wrap `McError` as one variant where configuration is involved.

use thiserror::Error;

/// The top-level error type for `mc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum McError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidSetting {
        key:    &'static str,
        value:  String,
        reason: String,
    },
}

/// Shorthand result type for all `mc-*` crates.
pub type McResult<T> = Result<T, McError>;
