//! Error type for `clinvar-store-sqlite`.

use std::{sync::Arc, time::Duration};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] clinvar_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// No pooled connection became free within the acquisition timeout.
  #[error("timed out after {0:?} waiting for a database connection")]
  AcquireTimeout(Duration),

  #[error("connection pool is closed")]
  PoolClosed,

  /// A worker task panicked or was aborted.
  #[error("query worker failed: {0}")]
  Join(String),

  /// The logical request this result belongs to failed. Every deferred
  /// handle of that request reports the same underlying error.
  #[error("request failed: {0}")]
  Request(#[from] Arc<Error>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
