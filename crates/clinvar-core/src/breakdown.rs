//! Breakdown assembler.
//!
//! Turns the raw grouped rows of one or more metric queries into the nested,
//! ordered structures the presentation layer renders. Nothing here touches
//! the store; every function is a pure transformation of rows already read.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  conflict::ConflictLevel,
  rows::{
    ConditionXref, ConflictLevelCount, DatedMethodCount, Grouped, LevelCount,
    SignificanceConflictCount, SignificanceCount, SignificancePairCount,
  },
  significance::{OVERVIEW_SIGNIFICANCES, SignificanceRanker},
};

// ─── Two-dimension breakdown ─────────────────────────────────────────────────

/// One primary key of a two-dimension breakdown.
///
/// A variant classified two ways under the same key counts once under each
/// term, so `total` counts interpretations and can exceed `variants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow<K> {
  pub key:      K,
  pub label:    Option<String>,
  pub xref:     Option<ConditionXref>,
  /// Distinct variants under this key.
  pub variants: i64,
  /// Sum of `counts`.
  pub total:    i64,
  /// Significance term → distinct variant count.
  pub counts:   BTreeMap<String, i64>,
}

impl<K> BreakdownRow<K> {
  pub fn secondary_total(&self) -> i64 { self.counts.values().sum() }
}

/// A primary dimension crossed with significance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceBreakdown<K> {
  /// In the order of the primary metric (descending count).
  pub rows:          Vec<BreakdownRow<K>>,
  /// Every significance observed, in domain-rank order.
  pub significances: Vec<String>,
}

impl<K: PartialEq> SignificanceBreakdown<K> {
  pub fn get(&self, key: &K) -> Option<&BreakdownRow<K>> {
    self.rows.iter().find(|r| &r.key == key)
  }
}

/// Build a breakdown from a plain "by X" result and its "by X and
/// significance" companion.
///
/// Pair rows whose primary key is missing from `totals` are dropped; both
/// inputs come from the same predicate set, so that only happens when the
/// caller mixed filters between them.
pub fn break_down_by_significance<T: Grouped>(
  totals: &[T],
  pairs: &[SignificancePairCount<T::Key>],
  ranker: &SignificanceRanker,
) -> SignificanceBreakdown<T::Key> {
  let mut rows: Vec<BreakdownRow<T::Key>> = Vec::with_capacity(totals.len());
  let mut index: HashMap<T::Key, usize> = HashMap::with_capacity(totals.len());

  for row in totals {
    index.insert(row.key().clone(), rows.len());
    rows.push(BreakdownRow {
      key:      row.key().clone(),
      label:    row.label().map(str::to_owned),
      xref:     row.xref(),
      variants: row.count(),
      total:    0,
      counts:   BTreeMap::new(),
    });
  }

  let mut significances = BTreeSet::new();
  for pair in pairs {
    let Some(&i) = index.get(&pair.key) else {
      tracing::debug!(significance = %pair.significance, "dropping pair row without a total");
      continue;
    };
    rows[i].counts.insert(pair.significance.clone(), pair.count);
    significances.insert(pair.significance.clone());
  }
  for row in &mut rows {
    row.total = row.secondary_total();
  }

  let mut significances: Vec<String> = significances.into_iter().collect();
  ranker.sort_terms(&mut significances);

  SignificanceBreakdown { rows, significances }
}

// ─── Conflict summary ────────────────────────────────────────────────────────

/// The three mutually exclusive tiers for one key, plus per-level counts.
///
/// `no_pair` and `pair_no_conflict` are `None` when the coarser result did
/// not contain the key and the tier could not be decomposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictTiers<K> {
  pub key:              K,
  pub label:            Option<String>,
  pub xref:             Option<ConditionXref>,
  pub total:            Option<i64>,
  pub no_pair:          Option<i64>,
  pub pair_no_conflict: Option<i64>,
  pub any_conflict:     i64,
  /// Counts per conflict level ≥ 1.
  pub levels:           BTreeMap<ConflictLevel, i64>,
}

impl<K> ConflictTiers<K> {
  pub fn level_total(&self) -> i64 { self.levels.values().sum() }

  /// True when all three tiers are known.
  pub fn is_decomposed(&self) -> bool {
    self.total.is_some() && self.no_pair.is_some() && self.pair_no_conflict.is_some()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSummary<K> {
  /// Keys with at least one conflict, in the order of the conflict metric.
  pub rows: Vec<ConflictTiers<K>>,
}

impl<K: PartialEq> ConflictSummary<K> {
  pub fn get(&self, key: &K) -> Option<&ConflictTiers<K>> {
    self.rows.iter().find(|r| &r.key == key)
  }
}

/// Decompose four metric results into conflict tiers.
///
/// - `totals`: every record (conflict floor −1)
/// - `potential`: records with a pairing (floor 0)
/// - `actual`: records in conflict (floor ≥ 1)
/// - `by_level`: records in conflict, per level
///
/// Only keys present in `actual` appear in the summary.
pub fn summarize_conflicts<T: Grouped>(
  totals: &[T],
  potential: &[T],
  actual: &[T],
  by_level: &[LevelCount<T::Key>],
) -> ConflictSummary<T::Key> {
  let mut rows: Vec<ConflictTiers<T::Key>> = Vec::with_capacity(actual.len());
  let mut index: HashMap<T::Key, usize> = HashMap::with_capacity(actual.len());

  for row in actual {
    index.insert(row.key().clone(), rows.len());
    rows.push(ConflictTiers {
      key:              row.key().clone(),
      label:            row.label().map(str::to_owned),
      xref:             row.xref(),
      total:            None,
      no_pair:          None,
      pair_no_conflict: None,
      any_conflict:     row.count(),
      levels:           BTreeMap::new(),
    });
  }

  for row in potential {
    if let Some(&i) = index.get(row.key()) {
      rows[i].pair_no_conflict = Some(row.count() - rows[i].any_conflict);
    }
  }

  for row in totals {
    if let Some(&i) = index.get(row.key()) {
      let tiers = &mut rows[i];
      tiers.total = Some(row.count());
      // Without the middle tier there is nothing to subtract.
      if let Some(pair_no_conflict) = tiers.pair_no_conflict {
        tiers.no_pair = Some(row.count() - pair_no_conflict - tiers.any_conflict);
      }
    }
  }

  for row in by_level {
    let Some(level) = ConflictLevel::new(row.conflict_level).filter(|l| l.is_conflict()) else {
      continue;
    };
    match index.get(&row.key) {
      Some(&i) => {
        rows[i].levels.insert(level, row.count);
      }
      None => tracing::debug!(%level, "dropping level row without a conflict total"),
    }
  }

  ConflictSummary { rows }
}

/// Per-level counts for levels ≥ 1.
pub fn conflict_overview(rows: &[ConflictLevelCount]) -> BTreeMap<ConflictLevel, i64> {
  rows
    .iter()
    .filter_map(|r| {
      ConflictLevel::new(r.conflict_level)
        .filter(|l| l.is_conflict())
        .map(|l| (l, r.count))
    })
    .collect()
}

// ─── Conflict breakdown by significance pair ─────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCell {
  pub level: i64,
  pub count: i64,
}

/// Significance on side 1 × significance on side 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictBreakdown {
  pub cells:          BTreeMap<String, BTreeMap<String, ConflictCell>>,
  pub significances1: Vec<String>,
  pub significances2: Vec<String>,
}

impl ConflictBreakdown {
  pub fn cell(&self, significance1: &str, significance2: &str) -> Option<ConflictCell> {
    self.cells.get(significance1)?.get(significance2).copied()
  }
}

pub fn break_down_conflicts(
  rows: &[SignificanceConflictCount],
  ranker: &SignificanceRanker,
) -> ConflictBreakdown {
  let mut cells: BTreeMap<String, BTreeMap<String, ConflictCell>> = BTreeMap::new();
  let mut side1 = BTreeSet::new();
  let mut side2 = BTreeSet::new();

  for row in rows {
    cells
      .entry(row.significance1.clone())
      .or_default()
      .insert(row.significance2.clone(), ConflictCell {
        level: row.conflict_level,
        count: row.count,
      });
    side1.insert(row.significance1.clone());
    side2.insert(row.significance2.clone());
  }

  let mut significances1: Vec<String> = side1.into_iter().collect();
  let mut significances2: Vec<String> = side2.into_iter().collect();
  ranker.sort_terms(&mut significances1);
  ranker.sort_terms(&mut significances2);

  ConflictBreakdown { cells, significances1, significances2 }
}

// ─── Significance overview ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceTotal {
  pub significance: String,
  pub count:        i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceOverview {
  pub entries: Vec<SignificanceTotal>,
}

impl SignificanceOverview {
  pub fn get(&self, significance: &str) -> Option<i64> {
    self
      .entries
      .iter()
      .find(|e| e.significance == significance)
      .map(|e| e.count)
  }
}

/// The five canonical buckets at zero, overlaid with observed counts, in
/// domain-rank order.
pub fn significance_overview(
  rows: &[SignificanceCount],
  ranker: &SignificanceRanker,
) -> SignificanceOverview {
  let mut counts: BTreeMap<String, i64> =
    OVERVIEW_SIGNIFICANCES.iter().map(|s| ((*s).to_owned(), 0)).collect();
  for row in rows {
    counts.insert(row.significance.clone(), row.count);
  }

  let mut entries: Vec<(String, i64)> = counts.into_iter().collect();
  ranker.sort_entries(&mut entries);

  SignificanceOverview {
    entries: entries
      .into_iter()
      .map(|(significance, count)| SignificanceTotal { significance, count })
      .collect(),
  }
}

// ─── Method history ──────────────────────────────────────────────────────────

/// Add a zero row for every (date, method) pair missing from `rows`, then
/// order by date. Rows within a date keep their incoming order.
pub fn fill_method_history(mut rows: Vec<DatedMethodCount>) -> Vec<DatedMethodCount> {
  let dates: BTreeSet<String> = rows.iter().map(|r| r.date.clone()).collect();
  let methods: BTreeSet<String> = rows.iter().map(|r| r.standardized_method.clone()).collect();
  let present: BTreeSet<(String, String)> = rows
    .iter()
    .map(|r| (r.date.clone(), r.standardized_method.clone()))
    .collect();

  for date in &dates {
    for method in &methods {
      if !present.contains(&(date.clone(), method.clone())) {
        rows.push(DatedMethodCount {
          date:                date.clone(),
          standardized_method: method.clone(),
          count:               0,
        });
      }
    }
  }

  rows.sort_by(|a, b| a.date.cmp(&b.date));
  rows
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Everything a "conflicting variants by X" page needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport<K> {
  pub overview:                               BTreeMap<ConflictLevel, i64>,
  pub total_variants:                         i64,
  pub total_potentially_conflicting_variants: i64,
  pub total_conflicting_variants:             i64,
  pub summary:                                ConflictSummary<K>,
}
