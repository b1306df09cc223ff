//! Decoding helpers from SQLite rows to the plain row types of
//! `clinvar-core`.
//!
//! Columns are read by the alias each metric query gives them, so a decoder
//! works for every query that selects the same aliases.

use clinvar_core::rows::{
  ConditionCount, ConflictLevelCount, CountryCount, DatedCount, DatedMethodCount, GeneCount,
  LevelCount, MethodCount, SignificanceConflictCount, SignificanceCount, SignificancePairCount,
  SignificanceTermInfo, SubmissionRow, SubmitterCount, SubmitterInfo, SubmitterSubmissionCount,
  VariantInfo, VariantRow,
};
use rusqlite::{Row, types::FromSql};

type Decoded<T> = rusqlite::Result<T>;

// ─── Grouped rows ────────────────────────────────────────────────────────────

pub fn gene_count(row: &Row<'_>) -> Decoded<GeneCount> {
  Ok(GeneCount {
    gene:            row.get("gene")?,
    condition_count: row.get("condition_count")?,
    submitter_count: row.get("submitter_count")?,
    count:           row.get("count")?,
  })
}

pub fn condition_count(row: &Row<'_>) -> Decoded<ConditionCount> {
  Ok(ConditionCount {
    condition_name:  row.get("condition_name")?,
    condition_db:    row.get("condition_db")?,
    condition_id:    row.get("condition_id")?,
    gene_count:      row.get("gene_count")?,
    submitter_count: row.get("submitter_count")?,
    count:           row.get("count")?,
  })
}

pub fn submitter_count(row: &Row<'_>) -> Decoded<SubmitterCount> {
  Ok(SubmitterCount {
    submitter_id:    row.get("submitter_id")?,
    submitter_name:  row.get("submitter_name")?,
    gene_count:      row.get("gene_count")?,
    condition_count: row.get("condition_count")?,
    count:           row.get("count")?,
  })
}

pub fn significance_count(row: &Row<'_>) -> Decoded<SignificanceCount> {
  Ok(SignificanceCount {
    significance:    row.get("significance")?,
    gene_count:      row.get("gene_count")?,
    condition_count: row.get("condition_count")?,
    submitter_count: row.get("submitter_count")?,
    count:           row.get("count")?,
  })
}

/// `key`, `significance`, `count`.
pub fn significance_pair<K: FromSql>(row: &Row<'_>) -> Decoded<SignificancePairCount<K>> {
  Ok(SignificancePairCount {
    key:          row.get("key")?,
    significance: row.get("significance")?,
    count:        row.get("count")?,
  })
}

/// `key`, `conflict_level`, `count`.
pub fn level_count<K: FromSql>(row: &Row<'_>) -> Decoded<LevelCount<K>> {
  Ok(LevelCount {
    key:            row.get("key")?,
    conflict_level: row.get("conflict_level")?,
    count:          row.get("count")?,
  })
}

pub fn conflict_level_count(row: &Row<'_>) -> Decoded<ConflictLevelCount> {
  Ok(ConflictLevelCount {
    conflict_level: row.get("conflict_level")?,
    count:          row.get("count")?,
  })
}

pub fn significance_conflict(row: &Row<'_>) -> Decoded<SignificanceConflictCount> {
  Ok(SignificanceConflictCount {
    significance1:  row.get("significance1")?,
    significance2:  row.get("significance2")?,
    conflict_level: row.get("conflict_level")?,
    count:          row.get("count")?,
  })
}

// ─── Listings ────────────────────────────────────────────────────────────────

pub fn variant(row: &Row<'_>) -> Decoded<VariantRow> {
  Ok(VariantRow {
    variant_name: row.get("variant_name")?,
    rsid:         row.get("rsid")?,
  })
}

pub fn submission(row: &Row<'_>) -> Decoded<SubmissionRow> {
  Ok(SubmissionRow {
    variant_name:   row.get("variant_name")?,
    submitter_id:   row.get("submitter_id")?,
    submitter_name: row.get("submitter_name")?,
    rcv:            row.get("rcv")?,
    scv:            row.get("scv")?,
    significance:   row.get("significance")?,
    last_eval:      row.get("last_eval")?,
    review_status:  row.get("review_status")?,
    condition_name: row.get("condition_name")?,
    method:         row.get("method")?,
    comment:        row.get("comment")?,
  })
}

pub fn country_count(row: &Row<'_>) -> Decoded<CountryCount> {
  Ok(CountryCount {
    country_code: row.get("country_code")?,
    country_name: row.get("country_name")?,
    count:        row.get("count")?,
  })
}

pub fn submitter_submission_count(row: &Row<'_>) -> Decoded<SubmitterSubmissionCount> {
  Ok(SubmitterSubmissionCount {
    submitter_id:   row.get("submitter_id")?,
    submitter_name: row.get("submitter_name")?,
    count:          row.get("count")?,
  })
}

pub fn method_count(row: &Row<'_>) -> Decoded<MethodCount> {
  Ok(MethodCount {
    method: row.get::<_, Option<String>>("method")?.unwrap_or_default(),
    count:  row.get("count")?,
  })
}

pub fn dated_method_count(row: &Row<'_>) -> Decoded<DatedMethodCount> {
  Ok(DatedMethodCount {
    date:                row.get("date")?,
    standardized_method: row
      .get::<_, Option<String>>("standardized_method")?
      .unwrap_or_default(),
    count:               row.get("count")?,
  })
}

pub fn dated_count(row: &Row<'_>) -> Decoded<DatedCount> {
  Ok(DatedCount { date: row.get("date")?, count: row.get("count")? })
}

pub fn significance_term_info(row: &Row<'_>) -> Decoded<SignificanceTermInfo> {
  Ok(SignificanceTermInfo {
    significance: row.get("significance")?,
    first_seen:   row.get("first_seen")?,
    last_seen:    row.get("last_seen")?,
  })
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

pub fn submitter_info(row: &Row<'_>) -> Decoded<SubmitterInfo> {
  Ok(SubmitterInfo {
    id:           row.get("submitter_id")?,
    name:         row.get("submitter_name")?,
    country_name: row.get("submitter_country_name")?,
  })
}

pub fn variant_info(row: &Row<'_>) -> Decoded<VariantInfo> {
  Ok(VariantInfo {
    id:   row.get("variant_id")?,
    name: row.get("variant_name")?,
    rsid: row.get("rsid")?,
  })
}

pub fn first_string(row: &Row<'_>) -> Decoded<String> { row.get(0) }

/// A `;`-separated cross-reference list.
pub fn xrefs(row: &Row<'_>) -> Decoded<Vec<String>> {
  let joined: String = row.get(0)?;
  Ok(joined.split(';').filter(|x| !x.is_empty()).map(str::to_owned).collect())
}
