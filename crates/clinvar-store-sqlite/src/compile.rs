//! Filter compiler.
//!
//! A [`QueryBuilder`] appends `AND <column> ...` predicates to a base query.
//! Scalars become named parameters. Sets become a temporary single-column
//! table, indexed on its value, joined in with `IN (SELECT value FROM ...)`.
//!
//! Every identifier that reaches the SQL text comes from [`Column`] or from a
//! `&'static str` fragment; caller-supplied values only ever travel as bound
//! parameters or as rows of a set table.

use clinvar_core::filter::Selector;
use rusqlite::{
  Connection, OptionalExtension as _, Row, ToSql,
  types::ToSqlOutput,
};

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// Columns a metric may filter or group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
  VariantName,
  Gene,
  NormalizedGene,
  GeneType,
  NormalizedGeneType,
  Submitter1Id,
  Submitter2Id,
  Submitter1CountryCode,
  Condition1Name,
  Condition2Name,
  Significance1,
  Significance2,
  NormalizedSignificance1,
  NormalizedSignificance2,
  StandardizedMethod1,
  StandardizedMethod2,
}

impl Column {
  pub const fn name(self) -> &'static str {
    match self {
      Self::VariantName => "variant_name",
      Self::Gene => "gene",
      Self::NormalizedGene => "normalized_gene",
      Self::GeneType => "gene_type",
      Self::NormalizedGeneType => "normalized_gene_type",
      Self::Submitter1Id => "submitter1_id",
      Self::Submitter2Id => "submitter2_id",
      Self::Submitter1CountryCode => "submitter1_country_code",
      Self::Condition1Name => "condition1_name",
      Self::Condition2Name => "condition2_name",
      Self::Significance1 => "significance1",
      Self::Significance2 => "significance2",
      Self::NormalizedSignificance1 => "normalized_significance1",
      Self::NormalizedSignificance2 => "normalized_significance2",
      Self::StandardizedMethod1 => "standardized_method1",
      Self::StandardizedMethod2 => "standardized_method2",
    }
  }

  pub const fn gene(original: bool) -> Self {
    if original { Self::Gene } else { Self::NormalizedGene }
  }

  pub const fn gene_type(original: bool) -> Self {
    if original { Self::GeneType } else { Self::NormalizedGeneType }
  }

  pub const fn significance1(original: bool) -> Self {
    if original { Self::Significance1 } else { Self::NormalizedSignificance1 }
  }

  pub const fn significance2(original: bool) -> Self {
    if original { Self::Significance2 } else { Self::NormalizedSignificance2 }
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
  Integer,
  Text,
}

impl SqlType {
  pub const fn name(self) -> &'static str {
    match self {
      Self::Integer => "INTEGER",
      Self::Text => "TEXT",
    }
  }
}

/// An owned bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bind {
  Integer(i64),
  Text(String),
}

impl ToSql for Bind {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    match self {
      Self::Integer(v) => v.to_sql(),
      Self::Text(v) => v.to_sql(),
    }
  }
}

/// A scalar type that can be bound or stored in a set table.
pub trait SqlScalar {
  const SQL_TYPE: SqlType;

  fn to_bind(&self) -> Bind;
}

impl SqlScalar for i64 {
  const SQL_TYPE: SqlType = SqlType::Integer;

  fn to_bind(&self) -> Bind { Bind::Integer(*self) }
}

impl SqlScalar for String {
  const SQL_TYPE: SqlType = SqlType::Text;

  fn to_bind(&self) -> Bind { Bind::Text(self.clone()) }
}

impl SqlScalar for str {
  const SQL_TYPE: SqlType = SqlType::Text;

  fn to_bind(&self) -> Bind { Bind::Text(self.to_owned()) }
}

/// A set filter waiting to be materialised as a temporary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetTable {
  pub name:     String,
  pub sql_type: SqlType,
  pub values:   Vec<Bind>,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct QueryBuilder {
  sql:    String,
  params: Vec<(String, Bind)>,
  sets:   Vec<SetTable>,
}

impl QueryBuilder {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, fragment: &'static str) -> &mut Self {
    self.sql.push_str(fragment);
    self
  }

  pub fn push_column(&mut self, column: Column) -> &mut Self {
    self.sql.push_str(column.name());
    self
  }

  /// Bind a parameter the base query already references, e.g. `:min_stars1`.
  pub fn bind<T: SqlScalar + ?Sized>(&mut self, name: &'static str, value: &T) -> &mut Self {
    self.params.push((name.to_owned(), value.to_bind()));
    self
  }

  pub fn and_equals<T: SqlScalar + ?Sized>(&mut self, column: Column, value: &T) -> &mut Self {
    self.and_compare(column, "=", value)
  }

  pub fn and_not_equals<T: SqlScalar + ?Sized>(&mut self, column: Column, value: &T) -> &mut Self {
    self.and_compare(column, "!=", value)
  }

  fn and_compare<T: SqlScalar + ?Sized>(
    &mut self,
    column: Column,
    op: &'static str,
    value: &T,
  ) -> &mut Self {
    let param = format!(":{}_{}", column.name(), self.params.len());
    self.sql.push_str(" AND ");
    self.sql.push_str(column.name());
    self.sql.push_str(op);
    self.sql.push_str(&param);
    self.params.push((param, value.to_bind()));
    self
  }

  /// Membership in `values`. An empty set adds nothing.
  pub fn and_in<T: SqlScalar>(&mut self, column: Column, values: &[T]) -> &mut Self {
    if values.is_empty() {
      return self;
    }
    let table = format!("filter_{}_{}", self.sets.len(), column.name());
    self.sql.push_str(" AND ");
    self.sql.push_str(column.name());
    self.sql.push_str(" IN (SELECT value FROM temp.");
    self.sql.push_str(&table);
    self.sql.push(')');
    self.sets.push(SetTable {
      name:     table,
      sql_type: T::SQL_TYPE,
      values:   values.iter().map(SqlScalar::to_bind).collect(),
    });
    self
  }

  /// Apply an optional selector: nothing, an equality, or a membership test.
  pub fn and_selector<T: SqlScalar>(
    &mut self,
    column: Column,
    selector: Option<&Selector<T>>,
  ) -> &mut Self {
    match selector {
      None => self,
      Some(Selector::One(value)) => self.and_equals(column, value),
      Some(Selector::Many(values)) => self.and_in(column, values),
    }
  }

  pub fn build(self, metric: &'static str) -> CompiledQuery {
    tracing::debug!(
      metric,
      params = self.params.len(),
      set_tables = self.sets.len(),
      "compiled metric query"
    );
    CompiledQuery { metric, sql: self.sql, params: self.params, sets: self.sets }
  }
}

// ─── Compiled query ──────────────────────────────────────────────────────────

/// A finished query: SQL text, named parameters and set tables to create.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
  pub metric: &'static str,
  pub sql:    String,
  pub params: Vec<(String, Bind)>,
  pub sets:   Vec<SetTable>,
}

impl CompiledQuery {
  fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
    self
      .params
      .iter()
      .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
      .collect()
  }

  fn materialize<'c>(&self, conn: &'c Connection) -> rusqlite::Result<Vec<SetTableGuard<'c>>> {
    self.sets.iter().map(|set| SetTableGuard::create(conn, set)).collect()
  }

  pub fn query_rows<T, F>(&self, conn: &Connection, mut map: F) -> rusqlite::Result<Vec<T>>
  where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
  {
    let _tables = self.materialize(conn)?;
    let params = self.named_params();
    let mut stmt = conn.prepare(&self.sql)?;
    let rows = stmt
      .query_map(params.as_slice(), |row| map(row))?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
  }

  pub fn query_optional<T, F>(&self, conn: &Connection, map: F) -> rusqlite::Result<Option<T>>
  where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
  {
    let _tables = self.materialize(conn)?;
    let params = self.named_params();
    let mut stmt = conn.prepare(&self.sql)?;
    let row = stmt.query_row(params.as_slice(), map).optional()?;
    Ok(row)
  }

  /// The first column of the first row, as a count.
  pub fn query_count(&self, conn: &Connection) -> rusqlite::Result<i64> {
    Ok(self.query_optional(conn, |row| row.get(0))?.unwrap_or(0))
  }
}

// ─── Set tables ──────────────────────────────────────────────────────────────

/// A temporary table that lives for exactly one query on one connection.
///
/// Created with drop-if-exists so a table left behind by an earlier query on
/// the same pooled connection cannot interfere; dropped again when the guard
/// goes out of scope.
struct SetTableGuard<'c> {
  conn: &'c Connection,
  name: String,
}

impl<'c> SetTableGuard<'c> {
  fn create(conn: &'c Connection, set: &SetTable) -> rusqlite::Result<Self> {
    let name = &set.name;
    let sql_type = set.sql_type.name();
    conn.execute_batch(&format!(
      "DROP TABLE IF EXISTS temp.{name};
       CREATE TEMP TABLE {name} (value {sql_type});
       CREATE INDEX temp.{name}__value ON {name} (value);"
    ))?;

    let guard = Self { conn, name: name.clone() };

    let tx = conn.unchecked_transaction()?;
    {
      let mut insert = tx.prepare(&format!("INSERT INTO temp.{name} (value) VALUES (?1)"))?;
      for value in &set.values {
        insert.execute([value])?;
      }
    }
    tx.commit()?;

    Ok(guard)
  }
}

impl Drop for SetTableGuard<'_> {
  fn drop(&mut self) {
    if let Err(e) = self
      .conn
      .execute_batch(&format!("DROP TABLE IF EXISTS temp.{}", self.name))
    {
      tracing::warn!(table = %self.name, error = %e, "failed to drop set-filter table");
    }
  }
}
