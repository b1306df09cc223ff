//! Store configuration.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

fn default_pool_size() -> usize { 4 }

fn default_timeout_ms() -> u64 { 20_000 }

/// Connection settings, usually deserialised from the binary's config file.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
  pub database_path:      PathBuf,
  /// Number of pooled connections, and so the number of metric queries that
  /// can run at once.
  #[serde(default = "default_pool_size")]
  pub pool_size:          usize,
  /// How long a query may wait for a free pooled connection.
  #[serde(default = "default_timeout_ms")]
  pub acquire_timeout_ms: u64,
  /// How long SQLite waits on a locked database before giving up.
  #[serde(default = "default_timeout_ms")]
  pub busy_timeout_ms:    u64,
}

impl StoreConfig {
  pub fn new(database_path: impl Into<PathBuf>) -> Self {
    Self {
      database_path:      database_path.into(),
      pool_size:          default_pool_size(),
      acquire_timeout_ms: default_timeout_ms(),
      busy_timeout_ms:    default_timeout_ms(),
    }
  }

  pub fn acquire_timeout(&self) -> Duration { Duration::from_millis(self.acquire_timeout_ms) }

  pub fn busy_timeout(&self) -> Duration { Duration::from_millis(self.busy_timeout_ms) }
}
