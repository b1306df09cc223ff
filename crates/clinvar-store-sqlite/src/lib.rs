//! SQLite backend for the ClinVar statistics engine.
//!
//! Metric queries are composed by the filter compiler, executed on a pool of
//! [`tokio_rusqlite`] connections (one dedicated thread each), and handed
//! back either directly or through deferred handles tied to one logical
//! request.

mod compile;
mod decode;
mod pool;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod reports;
pub mod schema;
pub mod store;

pub use compile::{Bind, Column, CompiledQuery, QueryBuilder, SetTable, SqlScalar, SqlType};
pub use config::StoreConfig;
pub use dispatch::{Deferred, Request};
pub use error::{Error, Result};
pub use metrics::Metric;
pub use store::ClinvarStore;

#[cfg(test)]
mod tests;
