//! Error types for `clinvar-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A filter value had the wrong shape or type for its key.
  #[error("malformed filter: {0}")]
  MalformedFilter(String),

  /// A line of a nonstandard-term table could not be parsed.
  #[error("malformed term table, line {line}: {reason}")]
  MalformedTermTable { line: usize, reason: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
