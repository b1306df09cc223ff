//! Plain row types returned by metric queries.
//!
//! These are what the presentation layer sees: owned, serialisable records
//! with no ties to the store that produced them.

use std::hash::Hash;

use serde::{Deserialize, Serialize};

// ─── Grouped rows ────────────────────────────────────────────────────────────

/// A row keyed on one dimension and carrying a distinct-variant count.
///
/// Implemented by every "by X" row so the assembler can work on any of them.
pub trait Grouped {
  type Key: Clone + Eq + Hash;

  fn key(&self) -> &Self::Key;
  fn count(&self) -> i64;
  /// A human-readable name for the key, when it is an opaque identifier.
  fn label(&self) -> Option<&str> { None }
  /// Where the key can be looked up outside ClinVar.
  fn xref(&self) -> Option<ConditionXref> { None }
}

/// A condition's identifier in an external database, e.g. MedGen `C0006142`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionXref {
  pub db: String,
  pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneCount {
  pub gene:            String,
  pub condition_count: i64,
  pub submitter_count: i64,
  pub count:           i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionCount {
  pub condition_name:  String,
  pub condition_db:    Option<String>,
  pub condition_id:    Option<String>,
  pub gene_count:      i64,
  pub submitter_count: i64,
  pub count:           i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterCount {
  pub submitter_id:    i64,
  pub submitter_name:  String,
  pub gene_count:      i64,
  pub condition_count: i64,
  pub count:           i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceCount {
  pub significance:    String,
  pub gene_count:      i64,
  pub condition_count: i64,
  pub submitter_count: i64,
  pub count:           i64,
}

impl Grouped for GeneCount {
  type Key = String;

  fn key(&self) -> &String { &self.gene }
  fn count(&self) -> i64 { self.count }
}

impl Grouped for ConditionCount {
  type Key = String;

  fn key(&self) -> &String { &self.condition_name }
  fn count(&self) -> i64 { self.count }
  fn xref(&self) -> Option<ConditionXref> {
    match (&self.condition_db, &self.condition_id) {
      (Some(db), Some(id)) => Some(ConditionXref { db: db.clone(), id: id.clone() }),
      _ => None,
    }
  }
}

impl Grouped for SubmitterCount {
  type Key = i64;

  fn key(&self) -> &i64 { &self.submitter_id }
  fn count(&self) -> i64 { self.count }
  fn label(&self) -> Option<&str> { Some(&self.submitter_name) }
}

impl Grouped for SignificanceCount {
  type Key = String;

  fn key(&self) -> &String { &self.significance }
  fn count(&self) -> i64 { self.count }
}

/// A count keyed on a primary dimension and a significance term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificancePairCount<K> {
  pub key:          K,
  pub significance: String,
  pub count:        i64,
}

/// A count keyed on a primary dimension and a conflict level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCount<K> {
  pub key:            K,
  pub conflict_level: i64,
  pub count:          i64,
}

/// A per-level count with no primary dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictLevelCount {
  pub conflict_level: i64,
  pub count:          i64,
}

/// One cell of the significance-versus-significance conflict matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceConflictCount {
  pub significance1:  String,
  pub significance2:  String,
  pub conflict_level: i64,
  pub count:          i64,
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRow {
  pub variant_name: String,
  pub rsid:         Option<String>,
}

/// One submission for a variant, as seen from side 1 of its comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
  pub variant_name:   String,
  pub submitter_id:   i64,
  pub submitter_name: String,
  pub rcv:            Option<String>,
  pub scv:            String,
  pub significance:   String,
  pub last_eval:      Option<String>,
  pub review_status:  Option<String>,
  pub condition_name: String,
  pub method:         Option<String>,
  pub comment:        Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
  pub country_code: String,
  pub country_name: String,
  pub count:        i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterSubmissionCount {
  pub submitter_id:   i64,
  pub submitter_name: String,
  pub count:          i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCount {
  pub method: String,
  pub count:  i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedMethodCount {
  pub date:                String,
  pub standardized_method: String,
  pub count:               i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatedCount {
  pub date:  String,
  pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignificanceTermInfo {
  pub significance: String,
  pub first_seen:   String,
  pub last_seen:    String,
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterInfo {
  pub id:           i64,
  pub name:         String,
  pub country_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantInfo {
  pub id:   i64,
  pub name: String,
  pub rsid: Option<String>,
}
