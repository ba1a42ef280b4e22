use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the monitoring core.
///
/// Probe failures are never represented here: they are encoded in the
/// returned [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] libsql::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("{0:#}")]
    Io(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid ledger record: {0}")]
    InvalidRecord(String),
}

impl<E: std::fmt::Display> From<deadpool::managed::PoolError<E>> for Error {
    fn from(value: deadpool::managed::PoolError<E>) -> Self {
        Self::Pool(value.to_string())
    }
}

impl From<deadpool::managed::BuildError> for Error {
    fn from(value: deadpool::managed::BuildError) -> Self {
        Self::Pool(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
