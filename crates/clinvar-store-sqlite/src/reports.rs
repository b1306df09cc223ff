//! Composed reports.
//!
//! Each report is one [`Request`](crate::Request): it defers every metric it
//! needs up front, waits for the whole request, and only then hands the rows
//! to the breakdown assembler. A report never assembles from a partially
//! failed request.

use clinvar_core::{
  breakdown::{
    self, ConflictBreakdown, ConflictReport, SignificanceBreakdown, SignificanceOverview,
  },
  conflict::{ALL_RECORDS, CONFLICTING_RECORDS, PAIRED_RECORDS},
  filter::MetricFilter,
  rows::{DatedMethodCount, Grouped, LevelCount, SignificancePairCount},
  significance::SignificanceRanker,
};
use serde::Serialize;

use crate::{ClinvarStore, Metric, Result, metrics};

type Grouping<T> = fn(&MetricFilter) -> Metric<Vec<T>>;

/// Headline counts for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
  pub max_date:          Option<String>,
  pub total_variants:    i64,
  pub total_genes:       i64,
  pub total_conditions:  i64,
  pub total_submitters:  i64,
  pub total_submissions: i64,
}

impl ClinvarStore {
  // ── Conflict summaries ────────────────────────────────────────────────────

  pub async fn conflict_summary_by_gene(
    &self,
    filter: &MetricFilter,
  ) -> Result<ConflictReport<String>> {
    self
      .conflict_summary(
        filter,
        metrics::total_variants_by_gene,
        metrics::total_variants_in_conflict_by_gene_and_conflict_level,
      )
      .await
  }

  pub async fn conflict_summary_by_condition(
    &self,
    filter: &MetricFilter,
  ) -> Result<ConflictReport<String>> {
    self
      .conflict_summary(
        filter,
        metrics::total_variants_by_condition,
        metrics::total_variants_in_conflict_by_condition_and_conflict_level,
      )
      .await
  }

  pub async fn conflict_summary_by_submitter(
    &self,
    filter: &MetricFilter,
  ) -> Result<ConflictReport<i64>> {
    self
      .conflict_summary(
        filter,
        metrics::total_variants_by_submitter,
        metrics::total_variants_in_conflict_by_submitter_and_conflict_level,
      )
      .await
  }

  /// The same grouping at three conflict floors (all records, paired,
  /// conflicting) plus its per-level split, decomposed into tiers.
  async fn conflict_summary<T>(
    &self,
    filter: &MetricFilter,
    by: Grouping<T>,
    by_level: Grouping<LevelCount<T::Key>>,
  ) -> Result<ConflictReport<T::Key>>
  where
    T: Grouped + Send + Sync + 'static,
    T::Key: Send + Sync + 'static,
  {
    // A caller-supplied floor can only raise the conflicting tier.
    let floor = filter.conflict_floor(CONFLICTING_RECORDS).max(CONFLICTING_RECORDS);
    let all = filter.clone().with_min_conflict_level(ALL_RECORDS);
    let paired = filter.clone().with_min_conflict_level(PAIRED_RECORDS);
    let conflicting = filter.clone().with_min_conflict_level(floor);

    let mut request = self.request();
    let overview =
      request.defer(metrics::total_variants_in_conflict_by_conflict_level(&conflicting));
    let total_variants = request.defer(metrics::total_variants(&all));
    let total_paired = request.defer(metrics::total_variants(&paired));
    let total_conflicting = request.defer(metrics::total_variants(&conflicting));
    let totals = request.defer(by(&all));
    let potential = request.defer(by(&paired));
    let actual = request.defer(by(&conflicting));
    let levels = request.defer(by_level(&conflicting));
    request.finish().await?;

    let summary = breakdown::summarize_conflicts(
      &totals.get().await?,
      &potential.get().await?,
      &actual.get().await?,
      &levels.get().await?,
    );

    Ok(ConflictReport {
      overview: breakdown::conflict_overview(&overview.get().await?),
      total_variants: *total_variants.get().await?,
      total_potentially_conflicting_variants: *total_paired.get().await?,
      total_conflicting_variants: *total_conflicting.get().await?,
      summary,
    })
  }

  // ── Significance breakdowns ───────────────────────────────────────────────

  pub async fn significance_breakdown_by_gene(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
  ) -> Result<SignificanceBreakdown<String>> {
    self
      .significance_breakdown(
        filter,
        ranker,
        metrics::total_variants_by_gene,
        metrics::total_variants_by_gene_and_significance,
      )
      .await
  }

  pub async fn significance_breakdown_by_condition(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
  ) -> Result<SignificanceBreakdown<String>> {
    self
      .significance_breakdown(
        filter,
        ranker,
        metrics::total_variants_by_condition,
        metrics::total_variants_by_condition_and_significance,
      )
      .await
  }

  pub async fn significance_breakdown_by_submitter(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
  ) -> Result<SignificanceBreakdown<i64>> {
    self
      .significance_breakdown(
        filter,
        ranker,
        metrics::total_variants_by_submitter,
        metrics::total_variants_by_submitter_and_significance,
      )
      .await
  }

  async fn significance_breakdown<T>(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
    by: Grouping<T>,
    by_significance: Grouping<SignificancePairCount<T::Key>>,
  ) -> Result<SignificanceBreakdown<T::Key>>
  where
    T: Grouped + Send + Sync + 'static,
    T::Key: Send + Sync + 'static,
  {
    let mut request = self.request();
    let totals = request.defer(by(filter));
    let pairs = request.defer(by_significance(filter));
    request.finish().await?;

    Ok(breakdown::break_down_by_significance(&totals.get().await?, &pairs.get().await?, ranker))
  }

  // ── Single-metric reports ─────────────────────────────────────────────────

  pub async fn conflict_breakdown(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
  ) -> Result<ConflictBreakdown> {
    let mut request = self.request();
    let rows =
      request.defer(metrics::total_variants_in_conflict_by_significance_and_significance(filter));
    request.finish().await?;

    Ok(breakdown::break_down_conflicts(&rows.get().await?, ranker))
  }

  pub async fn significance_overview(
    &self,
    filter: &MetricFilter,
    ranker: &SignificanceRanker,
  ) -> Result<SignificanceOverview> {
    let mut request = self.request();
    let rows = request.defer(metrics::total_variants_by_significance(filter));
    request.finish().await?;

    Ok(breakdown::significance_overview(&rows.get().await?, ranker))
  }

  /// Standardized-method counts per import date, zero-filled.
  pub async fn method_history(&self, filter: &MetricFilter) -> Result<Vec<DatedMethodCount>> {
    let mut request = self.request();
    let rows = request.defer(metrics::total_submissions_by_standardized_method_over_time(filter));
    request.finish().await?;

    Ok(breakdown::fill_method_history(rows.get_cloned().await?))
  }

  pub async fn totals(&self, filter: &MetricFilter) -> Result<Totals> {
    let mut request = self.request();
    let max_date = request.defer(metrics::max_date());
    let variants = request.defer(metrics::total_variants(filter));
    let genes = request.defer(metrics::total_genes(filter));
    let conditions = request.defer(metrics::total_conditions(filter));
    let submitters = request.defer(metrics::total_submitters(filter));
    let submissions = request.defer(metrics::total_submissions());
    request.finish().await?;

    Ok(Totals {
      max_date:          max_date.get_cloned().await?,
      total_variants:    *variants.get().await?,
      total_genes:       *genes.get().await?,
      total_conditions:  *conditions.get().await?,
      total_submitters:  *submitters.get().await?,
      total_submissions: *submissions.get().await?,
    })
  }
}
