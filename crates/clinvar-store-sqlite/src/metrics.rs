//! Metric query library.
//!
//! Every function here turns a [`MetricFilter`] into a [`Metric`]: a compiled
//! query plus the decoder for its rows. Nothing runs until the metric is
//! executed, either directly through [`crate::ClinvarStore::run`] or deferred
//! through a [`crate::Request`].
//!
//! All comparison metrics share one base predicate, a star-level floor on
//! each side and a conflict-level floor, followed by every dimension filter
//! the record carries. Filters are strictly conjunctive.

use clinvar_core::{
  conflict::{ALL_RECORDS, CONFLICTING_RECORDS},
  filter::MetricFilter,
  rows::{
    ConditionCount, ConflictLevelCount, CountryCount, DatedCount, DatedMethodCount, GeneCount,
    LevelCount, MethodCount, SignificanceConflictCount, SignificanceCount, SignificancePairCount,
    SignificanceTermInfo, SubmissionRow, SubmitterCount, SubmitterInfo, SubmitterSubmissionCount,
    VariantInfo, VariantRow,
  },
};
use rusqlite::{Connection, Row};

use crate::{
  compile::{Column, CompiledQuery, QueryBuilder},
  decode,
};

// ─── Metric ──────────────────────────────────────────────────────────────────

type Runner<T> = Box<dyn FnOnce(&CompiledQuery, &Connection) -> rusqlite::Result<T> + Send>;

/// A compiled metric query and the way its result is read back.
pub struct Metric<T> {
  query: CompiledQuery,
  run:   Runner<T>,
}

impl<T> Metric<T> {
  pub fn name(&self) -> &'static str { self.query.metric }

  pub fn query(&self) -> &CompiledQuery { &self.query }

  /// Run on a connection the caller holds exclusively.
  pub fn execute(self, conn: &Connection) -> rusqlite::Result<T> { (self.run)(&self.query, conn) }
}

impl Metric<i64> {
  /// A single scalar count; an empty result counts as zero.
  pub fn count(query: CompiledQuery) -> Self {
    Self {
      query,
      run: Box::new(|query: &CompiledQuery, conn: &Connection| query.query_count(conn)),
    }
  }
}

impl Metric<bool> {
  /// True when the query returns at least one row.
  pub fn exists(query: CompiledQuery) -> Self {
    Self {
      query,
      run: Box::new(|query: &CompiledQuery, conn: &Connection| {
        Ok(query.query_optional(conn, |_| Ok(()))?.is_some())
      }),
    }
  }
}

impl<R: 'static> Metric<Vec<R>> {
  pub fn rows(query: CompiledQuery, map: fn(&Row<'_>) -> rusqlite::Result<R>) -> Self {
    Self {
      query,
      run: Box::new(move |query: &CompiledQuery, conn: &Connection| query.query_rows(conn, map)),
    }
  }
}

impl<R: 'static> Metric<Option<R>> {
  /// The first row, if any.
  pub fn optional(query: CompiledQuery, map: fn(&Row<'_>) -> rusqlite::Result<R>) -> Self {
    Self {
      query,
      run: Box::new(move |query: &CompiledQuery, conn: &Connection| query.query_optional(conn, map)),
    }
  }
}

// ─── Shared predicate ────────────────────────────────────────────────────────

const CURRENT_COMPARISONS: &str = " FROM current_comparisons";
const ALL_COMPARISONS: &str = " FROM comparisons";

/// `FROM <table> WHERE <floors>` plus every dimension filter in `filter`.
fn comparisons(q: &mut QueryBuilder, table: &'static str, filter: &MetricFilter, floor: i64) {
  q.push(table)
    .push(
      " WHERE star_level1>=:min_stars1 AND star_level2>=:min_stars2 \
       AND conflict_level>=:min_conflict_level",
    )
    .bind(":min_stars1", &filter.min_stars1)
    .bind(":min_stars2", &filter.min_stars2)
    .bind(":min_conflict_level", &filter.conflict_floor(floor));

  if let Some(method) = &filter.standardized_method1 {
    q.and_equals(Column::StandardizedMethod1, method);
  }
  if let Some(method) = &filter.standardized_method2 {
    q.and_equals(Column::StandardizedMethod2, method);
  }
  if let Some(gene_type) = filter.gene_type {
    q.and_equals(Column::gene_type(filter.original_genes), &gene_type);
  }
  if let Some(variant_name) = &filter.variant_name {
    q.and_equals(Column::VariantName, variant_name);
  }

  q.and_selector(Column::gene(filter.original_genes), filter.gene.as_ref())
    .and_selector(Column::Condition1Name, filter.condition1_name.as_ref())
    .and_selector(Column::Submitter1Id, filter.submitter1_id.as_ref())
    .and_selector(Column::Submitter2Id, filter.submitter2_id.as_ref())
    .and_selector(Column::significance1(filter.original_terms), filter.significance1.as_ref())
    .and_selector(Column::significance2(filter.original_terms), filter.significance2.as_ref());
}

/// Which side of each comparison a condition- or submitter-keyed metric
/// groups on. Pinning one value on side 1 moves the grouping to side 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
  One,
  Two,
}

impl Side {
  fn for_condition(filter: &MetricFilter) -> Self {
    if filter.pins_condition() { Self::Two } else { Self::One }
  }

  fn for_submitter(filter: &MetricFilter) -> Self {
    if filter.pins_submitter() { Self::Two } else { Self::One }
  }

  fn condition(self) -> Column {
    match self {
      Self::One => Column::Condition1Name,
      Self::Two => Column::Condition2Name,
    }
  }

  fn submitter(self) -> Column {
    match self {
      Self::One => Column::Submitter1Id,
      Self::Two => Column::Submitter2Id,
    }
  }

  fn significance(self, original: bool) -> Column {
    match self {
      Self::One => Column::significance1(original),
      Self::Two => Column::significance2(original),
    }
  }
}

// ─── Scalar totals ───────────────────────────────────────────────────────────

pub fn total_variants(filter: &MetricFilter) -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(DISTINCT variant_name)");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  Metric::count(q.build("total_variants"))
}

pub fn total_genes(filter: &MetricFilter) -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(DISTINCT ")
    .push_column(Column::gene(filter.original_genes))
    .push(")");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  Metric::count(q.build("total_genes"))
}

pub fn total_conditions(filter: &MetricFilter) -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(DISTINCT condition1_name)");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  Metric::count(q.build("total_conditions"))
}

pub fn total_submitters(filter: &MetricFilter) -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(DISTINCT submitter1_id)");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  Metric::count(q.build("total_submitters"))
}

/// Rows in the current submission snapshot.
pub fn total_submissions() -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(*) FROM current_submissions");
  Metric::count(q.build("total_submissions"))
}

/// Variants where neither side of any matching comparison carries
/// `significance`.
pub fn total_variants_without_significance(
  filter: &MetricFilter,
  significance: &str,
) -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(DISTINCT variant_name)");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.and_not_equals(Column::significance1(filter.original_terms), significance)
    .and_not_equals(Column::significance2(filter.original_terms), significance);
  Metric::count(q.build("total_variants_without_significance"))
}

// ─── By gene ─────────────────────────────────────────────────────────────────

pub fn total_variants_by_gene(filter: &MetricFilter) -> Metric<Vec<GeneCount>> {
  let gene = Column::gene(filter.original_genes);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(gene)
    .push(
      " AS gene, COUNT(DISTINCT condition1_name) AS condition_count, \
       COUNT(DISTINCT submitter1_id) AS submitter_count, \
       COUNT(DISTINCT variant_name) AS count",
    );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY ")
    .push_column(gene)
    .push(" ORDER BY count DESC, ")
    .push_column(gene);
  Metric::rows(q.build("total_variants_by_gene"), decode::gene_count)
}

/// Unordered; the breakdown orders significance columns by domain rank.
pub fn total_variants_by_gene_and_significance(
  filter: &MetricFilter,
) -> Metric<Vec<SignificancePairCount<String>>> {
  let gene = Column::gene(filter.original_genes);
  let significance = Column::significance1(filter.original_terms);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(gene)
    .push(" AS key, ")
    .push_column(significance)
    .push(" AS significance, COUNT(DISTINCT variant_name) AS count");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY ")
    .push_column(gene)
    .push(", ")
    .push_column(significance);
  Metric::rows(
    q.build("total_variants_by_gene_and_significance"),
    decode::significance_pair::<String>,
  )
}

// ─── By condition ────────────────────────────────────────────────────────────

pub fn total_variants_by_condition(filter: &MetricFilter) -> Metric<Vec<ConditionCount>> {
  let side = Side::for_condition(filter);
  let mut q = QueryBuilder::new();
  q.push(match side {
    Side::One => {
      "SELECT condition1_name AS condition_name, MAX(condition1_db) AS condition_db, \
       MAX(condition1_id) AS condition_id"
    }
    Side::Two => {
      "SELECT condition2_name AS condition_name, MAX(condition2_db) AS condition_db, \
       MAX(condition2_id) AS condition_id"
    }
  })
  .push(", COUNT(DISTINCT ")
  .push_column(Column::gene(filter.original_genes))
  .push(
    ") AS gene_count, COUNT(DISTINCT submitter1_id) AS submitter_count, \
     COUNT(DISTINCT variant_name) AS count",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY ")
    .push_column(side.condition())
    .push(" ORDER BY count DESC, condition_name");
  Metric::rows(q.build("total_variants_by_condition"), decode::condition_count)
}

pub fn total_variants_by_condition_and_significance(
  filter: &MetricFilter,
) -> Metric<Vec<SignificancePairCount<String>>> {
  let side = Side::for_condition(filter);
  let significance = side.significance(filter.original_terms);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(side.condition())
    .push(" AS key, ")
    .push_column(significance)
    .push(" AS significance, COUNT(DISTINCT variant_name) AS count");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY ")
    .push_column(side.condition())
    .push(", ")
    .push_column(significance);
  Metric::rows(
    q.build("total_variants_by_condition_and_significance"),
    decode::significance_pair::<String>,
  )
}

// ─── By submitter ────────────────────────────────────────────────────────────

pub fn total_variants_by_submitter(filter: &MetricFilter) -> Metric<Vec<SubmitterCount>> {
  let side = Side::for_submitter(filter);
  let mut q = QueryBuilder::new();
  q.push(match side {
    Side::One => "SELECT submitter1_id AS submitter_id, MAX(submitter1_name) AS submitter_name",
    Side::Two => "SELECT submitter2_id AS submitter_id, MAX(submitter2_name) AS submitter_name",
  })
  .push(", COUNT(DISTINCT ")
  .push_column(Column::gene(filter.original_genes))
  .push(
    ") AS gene_count, COUNT(DISTINCT condition1_name) AS condition_count, \
     COUNT(DISTINCT variant_name) AS count",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.and_in(side.submitter(), &filter.submitter_ids)
    .push(" GROUP BY ")
    .push_column(side.submitter())
    .push(" ORDER BY count DESC, submitter_id");
  Metric::rows(q.build("total_variants_by_submitter"), decode::submitter_count)
}

pub fn total_variants_by_submitter_and_significance(
  filter: &MetricFilter,
) -> Metric<Vec<SignificancePairCount<i64>>> {
  let side = Side::for_submitter(filter);
  let significance = side.significance(filter.original_terms);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(side.submitter())
    .push(" AS key, ")
    .push_column(significance)
    .push(" AS significance, COUNT(DISTINCT variant_name) AS count");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.and_in(side.submitter(), &filter.submitter_ids)
    .push(" GROUP BY ")
    .push_column(side.submitter())
    .push(", ")
    .push_column(significance);
  Metric::rows(
    q.build("total_variants_by_submitter_and_significance"),
    decode::significance_pair::<i64>,
  )
}

// ─── By significance ─────────────────────────────────────────────────────────

pub fn total_variants_by_significance(filter: &MetricFilter) -> Metric<Vec<SignificanceCount>> {
  let significance = Column::significance1(filter.original_terms);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(significance)
    .push(" AS significance, COUNT(DISTINCT ")
    .push_column(Column::gene(filter.original_genes))
    .push(
      ") AS gene_count, COUNT(DISTINCT condition1_name) AS condition_count, \
       COUNT(DISTINCT submitter1_id) AS submitter_count, \
       COUNT(DISTINCT variant_name) AS count",
    );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY ")
    .push_column(significance)
    .push(" ORDER BY count DESC, significance");
  Metric::rows(q.build("total_variants_by_significance"), decode::significance_count)
}

// ─── In conflict ─────────────────────────────────────────────────────────────

/// Each variant counts once, at the highest level any of its matching
/// comparisons reaches, so the levels sum to the conflicting total.
pub fn total_variants_in_conflict_by_conflict_level(
  filter: &MetricFilter,
) -> Metric<Vec<ConflictLevelCount>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT max_level AS conflict_level, COUNT(*) AS count FROM (\
     SELECT variant_name, MAX(conflict_level) AS max_level",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, CONFLICTING_RECORDS);
  q.push(" GROUP BY variant_name) GROUP BY max_level ORDER BY max_level");
  Metric::rows(
    q.build("total_variants_in_conflict_by_conflict_level"),
    decode::conflict_level_count,
  )
}

/// `SELECT key, conflict_level, count` where each (key, variant) is counted
/// once at its highest level. `restrict` adds predicates after the shared
/// ones.
fn by_key_and_max_level(
  filter: &MetricFilter,
  key: Column,
  restrict: impl FnOnce(&mut QueryBuilder),
) -> QueryBuilder {
  let mut q = QueryBuilder::new();
  q.push("SELECT key, max_level AS conflict_level, COUNT(*) AS count FROM (SELECT ")
    .push_column(key)
    .push(" AS key, variant_name, MAX(conflict_level) AS max_level");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, CONFLICTING_RECORDS);
  restrict(&mut q);
  q.push(" GROUP BY ")
    .push_column(key)
    .push(", variant_name) GROUP BY key, max_level");
  q
}

pub fn total_variants_in_conflict_by_gene_and_conflict_level(
  filter: &MetricFilter,
) -> Metric<Vec<LevelCount<String>>> {
  let q = by_key_and_max_level(filter, Column::gene(filter.original_genes), |_| {});
  Metric::rows(
    q.build("total_variants_in_conflict_by_gene_and_conflict_level"),
    decode::level_count::<String>,
  )
}

pub fn total_variants_in_conflict_by_condition_and_conflict_level(
  filter: &MetricFilter,
) -> Metric<Vec<LevelCount<String>>> {
  let side = Side::for_condition(filter);
  let q = by_key_and_max_level(filter, side.condition(), |_| {});
  Metric::rows(
    q.build("total_variants_in_conflict_by_condition_and_conflict_level"),
    decode::level_count::<String>,
  )
}

pub fn total_variants_in_conflict_by_submitter_and_conflict_level(
  filter: &MetricFilter,
) -> Metric<Vec<LevelCount<i64>>> {
  let side = Side::for_submitter(filter);
  let q = by_key_and_max_level(filter, side.submitter(), |q| {
    q.and_in(side.submitter(), &filter.submitter_ids);
  });
  Metric::rows(
    q.build("total_variants_in_conflict_by_submitter_and_conflict_level"),
    decode::level_count::<i64>,
  )
}

/// Side-1 significance × side-2 significance. The level reported for a cell
/// is the highest seen among its comparisons.
pub fn total_variants_in_conflict_by_significance_and_significance(
  filter: &MetricFilter,
) -> Metric<Vec<SignificanceConflictCount>> {
  let significance1 = Column::significance1(filter.original_terms);
  let significance2 = Column::significance2(filter.original_terms);
  let mut q = QueryBuilder::new();
  q.push("SELECT ")
    .push_column(significance1)
    .push(" AS significance1, ")
    .push_column(significance2)
    .push(
      " AS significance2, MAX(conflict_level) AS conflict_level, \
       COUNT(DISTINCT variant_name) AS count",
    );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, CONFLICTING_RECORDS);
  q.push(" GROUP BY ")
    .push_column(significance1)
    .push(", ")
    .push_column(significance2);
  Metric::rows(
    q.build("total_variants_in_conflict_by_significance_and_significance"),
    decode::significance_conflict,
  )
}

// ─── Listings ────────────────────────────────────────────────────────────────

pub fn variants(filter: &MetricFilter) -> Metric<Vec<VariantRow>> {
  let mut q = QueryBuilder::new();
  q.push("SELECT variant_name, MAX(rsid) AS rsid");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY variant_name ORDER BY variant_name");
  Metric::rows(q.build("variants"), decode::variant)
}

/// One row per side-1 SCV; usually narrowed with `variant_name`.
pub fn submissions(filter: &MetricFilter) -> Metric<Vec<SubmissionRow>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT variant_name, submitter1_id AS submitter_id, submitter1_name AS submitter_name, \
     rcv1 AS rcv, scv1 AS scv, significance1 AS significance, last_eval1 AS last_eval, \
     review_status1 AS review_status, condition1_name AS condition_name, method1 AS method, \
     comment1 AS comment",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY scv1 ORDER BY submitter_name, scv");
  Metric::rows(q.build("submissions"), decode::submission)
}

pub fn total_submissions_by_country(filter: &MetricFilter) -> Metric<Vec<CountryCount>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT submitter1_country_code AS country_code, \
     MAX(submitter1_country_name) AS country_name, COUNT(DISTINCT scv1) AS count",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY submitter1_country_code ORDER BY count DESC, country_code");
  Metric::rows(q.build("total_submissions_by_country"), decode::country_count)
}

/// Optionally narrowed to one country with `country_code`.
pub fn total_submissions_by_submitter(
  filter: &MetricFilter,
) -> Metric<Vec<SubmitterSubmissionCount>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT submitter1_id AS submitter_id, MAX(submitter1_name) AS submitter_name, \
     COUNT(DISTINCT scv1) AS count",
  );
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  if let Some(country_code) = &filter.country_code {
    q.and_equals(Column::Submitter1CountryCode, country_code);
  }
  q.and_in(Column::Submitter1Id, &filter.submitter_ids)
    .push(" GROUP BY submitter1_id ORDER BY count DESC, submitter_id");
  Metric::rows(q.build("total_submissions_by_submitter"), decode::submitter_submission_count)
}

pub fn total_submissions_by_method(filter: &MetricFilter) -> Metric<Vec<MethodCount>> {
  let mut q = QueryBuilder::new();
  q.push("SELECT method1 AS method, COUNT(DISTINCT scv1) AS count");
  comparisons(&mut q, CURRENT_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY method1 ORDER BY count DESC, method");
  Metric::rows(q.build("total_submissions_by_method"), decode::method_count)
}

/// Reads the full history relation, not just the current snapshot.
pub fn total_submissions_by_standardized_method_over_time(
  filter: &MetricFilter,
) -> Metric<Vec<DatedMethodCount>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT date, standardized_method1 AS standardized_method, COUNT(DISTINCT scv1) AS count",
  );
  comparisons(&mut q, ALL_COMPARISONS, filter, ALL_RECORDS);
  q.push(" GROUP BY date, standardized_method1 ORDER BY date, count DESC");
  Metric::rows(
    q.build("total_submissions_by_standardized_method_over_time"),
    decode::dated_method_count,
  )
}

pub fn total_significance_terms_over_time() -> Metric<Vec<DatedCount>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT date, COUNT(DISTINCT significance) AS count FROM submissions \
     GROUP BY date ORDER BY date",
  );
  Metric::rows(q.build("total_significance_terms_over_time"), decode::dated_count)
}

/// First and last import date each raw significance term was seen, most
/// recently retired first.
pub fn significance_term_info() -> Metric<Vec<SignificanceTermInfo>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT significance, MIN(date) AS first_seen, MAX(date) AS last_seen FROM submissions \
     GROUP BY significance ORDER BY last_seen DESC, first_seen DESC, significance",
  );
  Metric::rows(q.build("significance_term_info"), decode::significance_term_info)
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

/// Matches either the raw or the normalized symbol.
pub fn is_gene(gene: &str) -> Metric<bool> {
  let mut q = QueryBuilder::new();
  q.push("SELECT 1 FROM current_submissions WHERE (gene=:gene OR normalized_gene=:gene) LIMIT 1")
    .bind(":gene", gene);
  Metric::exists(q.build("is_gene"))
}

pub fn is_significance(significance: &str) -> Metric<bool> {
  let mut q = QueryBuilder::new();
  q.push("SELECT 1 FROM current_submissions WHERE significance=:significance LIMIT 1")
    .bind(":significance", significance);
  Metric::exists(q.build("is_significance"))
}

pub fn is_condition_name(condition_name: &str) -> Metric<bool> {
  let mut q = QueryBuilder::new();
  q.push("SELECT 1 FROM current_submissions WHERE condition_name=:condition_name LIMIT 1")
    .bind(":condition_name", condition_name);
  Metric::exists(q.build("is_condition_name"))
}

pub fn is_variant_name(variant_name: &str) -> Metric<bool> {
  let mut q = QueryBuilder::new();
  q.push("SELECT 1 FROM current_submissions WHERE variant_name=:variant_name LIMIT 1")
    .bind(":variant_name", variant_name);
  Metric::exists(q.build("is_variant_name"))
}

/// Date of the current snapshot; `None` on an empty database.
pub fn max_date() -> Metric<Option<String>> {
  let mut q = QueryBuilder::new();
  q.push("SELECT date FROM current_submissions ORDER BY date DESC LIMIT 1");
  Metric::optional(q.build("max_date"), decode::first_string)
}

pub fn submitter_info(submitter_id: i64) -> Metric<Option<SubmitterInfo>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT submitter_id, submitter_name, submitter_country_name FROM current_submissions \
     WHERE submitter_id=:submitter_id LIMIT 1",
  )
  .bind(":submitter_id", &submitter_id);
  Metric::optional(q.build("submitter_info"), decode::submitter_info)
}

/// Cross-references for a condition, preferring a row that has any.
pub fn condition_xrefs(condition_name: &str) -> Metric<Option<Vec<String>>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT DISTINCT condition_xrefs FROM current_submissions \
     WHERE condition_name=:condition_name ORDER BY condition_xrefs='' LIMIT 1",
  )
  .bind(":condition_name", condition_name);
  Metric::optional(q.build("condition_xrefs"), decode::xrefs)
}

pub fn variant_info(variant_name: &str) -> Metric<Option<VariantInfo>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT variant_id, variant_name, rsid FROM current_submissions \
     WHERE variant_name=:variant_name AND variant_id IS NOT NULL LIMIT 1",
  )
  .bind(":variant_name", variant_name);
  Metric::optional(q.build("variant_info"), decode::variant_info)
}

pub fn country_name(country_code: &str) -> Metric<Option<String>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT submitter_country_name FROM current_submissions \
     WHERE submitter_country_code=:country_code LIMIT 1",
  )
  .bind(":country_code", country_code);
  Metric::optional(q.build("country_name"), decode::first_string)
}

/// The method a submitter uses most often.
pub fn submitter_primary_method(submitter_id: i64) -> Metric<Option<String>> {
  let mut q = QueryBuilder::new();
  q.push(
    "SELECT method FROM current_submissions \
     WHERE submitter_id=:submitter_id AND method IS NOT NULL \
     GROUP BY method ORDER BY COUNT(*) DESC, method LIMIT 1",
  )
  .bind(":submitter_id", &submitter_id);
  Metric::optional(q.build("submitter_primary_method"), decode::first_string)
}
