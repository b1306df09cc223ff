//! SQL schema of the relations the engine reads.
//!
//! The tables are bulk-rebuilt by the import pipeline; the engine never
//! writes to them. The DDL lives here so tests, fixtures and fresh databases
//! agree on column names and types. `current_*` tables hold only the rows of
//! the most recent import date.

/// Columns of `comparisons` and `current_comparisons`.
///
/// Each row pairs two submissions for the same variant. A submission with no
/// partner appears once with both sides equal and `conflict_level = -1`.
pub const COMPARISON_COLUMNS: &str = "
    date                     TEXT    NOT NULL,
    variant_name             TEXT    NOT NULL,
    rsid                     TEXT,
    gene                     TEXT    NOT NULL DEFAULT '',
    gene_type                INTEGER NOT NULL DEFAULT 0,
    normalized_gene          TEXT    NOT NULL DEFAULT '',
    normalized_gene_type     INTEGER NOT NULL DEFAULT 0,
    submitter1_id            INTEGER NOT NULL,
    submitter1_name          TEXT    NOT NULL,
    submitter1_country_code  TEXT    NOT NULL DEFAULT '',
    submitter1_country_name  TEXT    NOT NULL DEFAULT '',
    rcv1                     TEXT,
    scv1                     TEXT    NOT NULL,
    significance1            TEXT    NOT NULL,
    normalized_significance1 TEXT    NOT NULL,
    last_eval1               TEXT,
    review_status1           TEXT,
    star_level1              INTEGER NOT NULL DEFAULT 0,
    condition1_name          TEXT    NOT NULL,
    condition1_db            TEXT,
    condition1_id            TEXT,
    method1                  TEXT,
    standardized_method1     TEXT,
    comment1                 TEXT,
    submitter2_id            INTEGER NOT NULL,
    submitter2_name          TEXT    NOT NULL,
    submitter2_country_code  TEXT    NOT NULL DEFAULT '',
    submitter2_country_name  TEXT    NOT NULL DEFAULT '',
    rcv2                     TEXT,
    scv2                     TEXT    NOT NULL,
    significance2            TEXT    NOT NULL,
    normalized_significance2 TEXT    NOT NULL,
    last_eval2               TEXT,
    review_status2           TEXT,
    star_level2              INTEGER NOT NULL DEFAULT 0,
    condition2_name          TEXT    NOT NULL,
    condition2_db            TEXT,
    condition2_id            TEXT,
    method2                  TEXT,
    standardized_method2     TEXT,
    comment2                 TEXT,
    conflict_level           INTEGER NOT NULL    -- -1 unpaired, 0..5 otherwise
";

/// Columns of `submissions` and `current_submissions`.
pub const SUBMISSION_COLUMNS: &str = "
    date                    TEXT    NOT NULL,
    variant_id              INTEGER,
    variant_name            TEXT    NOT NULL,
    rsid                    TEXT,
    gene                    TEXT    NOT NULL DEFAULT '',
    gene_type               INTEGER NOT NULL DEFAULT 0,
    normalized_gene         TEXT    NOT NULL DEFAULT '',
    normalized_gene_type    INTEGER NOT NULL DEFAULT 0,
    submitter_id            INTEGER NOT NULL,
    submitter_name          TEXT    NOT NULL,
    submitter_country_code  TEXT    NOT NULL DEFAULT '',
    submitter_country_name  TEXT    NOT NULL DEFAULT '',
    rcv                     TEXT,
    scv                     TEXT    NOT NULL,
    significance            TEXT    NOT NULL,
    normalized_significance TEXT    NOT NULL,
    last_eval               TEXT,
    review_status           TEXT,
    star_level              INTEGER NOT NULL DEFAULT 0,
    condition_name          TEXT    NOT NULL,
    condition_db            TEXT,
    condition_id            TEXT,
    condition_xrefs         TEXT    NOT NULL DEFAULT '',
    method                  TEXT,
    standardized_method     TEXT
";

/// Columns of `current_comparisons` used as equality or membership filters.
const INDEXED_COMPARISON_COLUMNS: &[&str] = &[
  "variant_name",
  "gene",
  "gene_type",
  "normalized_gene",
  "normalized_gene_type",
  "submitter1_id",
  "submitter1_name",
  "submitter1_country_code",
  "scv1",
  "significance1",
  "normalized_significance1",
  "star_level1",
  "condition1_name",
  "method1",
  "standardized_method1",
  "submitter2_id",
  "significance2",
  "normalized_significance2",
  "star_level2",
  "standardized_method2",
  "condition2_name",
  "conflict_level",
];

const INDEXED_SUBMISSION_COLUMNS: &[&str] = &[
  "variant_name",
  "rsid",
  "gene",
  "normalized_gene",
  "rcv",
  "scv",
  "submitter_id",
  "submitter_name",
  "submitter_country_code",
  "significance",
  "condition_name",
  "condition_xrefs",
  "method",
];

/// Full DDL; idempotent thanks to `IF NOT EXISTS`.
pub fn schema_sql() -> String {
  let mut sql = String::new();

  for table in ["submissions", "current_submissions"] {
    sql.push_str(&format!("CREATE TABLE IF NOT EXISTS {table} ({SUBMISSION_COLUMNS});\n"));
  }
  for table in ["comparisons", "current_comparisons"] {
    sql.push_str(&format!("CREATE TABLE IF NOT EXISTS {table} ({COMPARISON_COLUMNS});\n"));
  }

  for column in INDEXED_SUBMISSION_COLUMNS {
    sql.push_str(&format!(
      "CREATE INDEX IF NOT EXISTS current_submissions__{column} \
       ON current_submissions ({column});\n"
    ));
  }
  for column in INDEXED_COMPARISON_COLUMNS {
    sql.push_str(&format!(
      "CREATE INDEX IF NOT EXISTS current_comparisons__{column} \
       ON current_comparisons ({column});\n"
    ));
  }

  sql.push_str("CREATE INDEX IF NOT EXISTS submissions__date ON submissions (date);\n");
  sql.push_str("CREATE INDEX IF NOT EXISTS comparisons__date ON comparisons (date);\n");
  sql
}
