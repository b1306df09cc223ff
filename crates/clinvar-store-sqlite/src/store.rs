//! [`ClinvarStore`], the entry point to the SQLite backend.

use clinvar_core::rows::{SubmitterInfo, VariantInfo};

use crate::{
  Metric, Request, Result, StoreConfig, metrics,
  pool::ConnectionPool,
  schema::schema_sql,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A read-only view of a ClinVar statistics database.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct ClinvarStore {
  pool: ConnectionPool,
}

impl ClinvarStore {
  /// Open a pool of connections to the database named in `config`.
  pub async fn open(config: &StoreConfig) -> Result<Self> {
    let pool = ConnectionPool::open(config).await?;
    Ok(Self { pool })
  }

  /// Create any missing tables and indexes. Only fresh databases and test
  /// fixtures need this; imported databases already carry the schema.
  pub async fn init_schema(&self) -> Result<()> {
    let conn = self.pool.acquire().await?;
    conn
      .call(|conn| {
        conn.execute_batch(&schema_sql())?;
        Ok(())
      })
      .await
  }

  /// Begin a logical request whose metrics run concurrently.
  pub fn request(&self) -> Request { Request::new(self.pool.clone()) }

  /// Run one metric to completion on a pooled connection.
  pub async fn run<T>(&self, metric: Metric<T>) -> Result<T>
  where
    T: Send + 'static,
  {
    let name = metric.name();
    let conn = self.pool.acquire().await?;
    tracing::debug!(metric = name, "running metric");
    conn.call(move |conn| Ok(metric.execute(conn)?)).await
  }

  /// Refuse new queries; those already running finish normally.
  pub fn close(&self) { self.pool.close(); }

  // ── Lookups ───────────────────────────────────────────────────────────────

  pub async fn is_gene(&self, gene: &str) -> Result<bool> {
    self.run(metrics::is_gene(gene)).await
  }

  pub async fn is_significance(&self, significance: &str) -> Result<bool> {
    self.run(metrics::is_significance(significance)).await
  }

  pub async fn is_condition_name(&self, condition_name: &str) -> Result<bool> {
    self.run(metrics::is_condition_name(condition_name)).await
  }

  pub async fn is_variant_name(&self, variant_name: &str) -> Result<bool> {
    self.run(metrics::is_variant_name(variant_name)).await
  }

  pub async fn max_date(&self) -> Result<Option<String>> { self.run(metrics::max_date()).await }

  pub async fn submitter_info(&self, submitter_id: i64) -> Result<Option<SubmitterInfo>> {
    self.run(metrics::submitter_info(submitter_id)).await
  }

  pub async fn condition_xrefs(&self, condition_name: &str) -> Result<Option<Vec<String>>> {
    self.run(metrics::condition_xrefs(condition_name)).await
  }

  pub async fn variant_info(&self, variant_name: &str) -> Result<Option<VariantInfo>> {
    self.run(metrics::variant_info(variant_name)).await
  }

  pub async fn country_name(&self, country_code: &str) -> Result<Option<String>> {
    self.run(metrics::country_name(country_code)).await
  }

  pub async fn submitter_primary_method(&self, submitter_id: i64) -> Result<Option<String>> {
    self.run(metrics::submitter_primary_method(submitter_id)).await
  }
}
