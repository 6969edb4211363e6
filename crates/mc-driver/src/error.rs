use mc_core::McError;
use mc_pool::PoolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver configuration error: {0}")]
    Config(#[from] McError),

    #[error("{0}")]
    Pool(#[from] PoolError),
}

pub type DriverResult<T> = Result<T, DriverError>;
