//! Integration tests for `ClinvarStore` against a fixture database.
//!
//! The fixture lives in a temporary directory rather than in memory so every
//! pooled connection sees the same data.

use std::sync::Arc;

use clinvar_core::{
  conflict::ConflictLevel,
  filter::{MetricFilter, Selector},
  rows::{ConditionXref, GeneCount, LevelCount, SignificancePairCount, SubmitterInfo},
  significance::SignificanceRanker,
};
use rusqlite::params;
use tempfile::TempDir;

use crate::{ClinvarStore, Error, Metric, QueryBuilder, StoreConfig, metrics};

// ─── Fixture ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Lab {
  id:           i64,
  name:         &'static str,
  country_code: &'static str,
  country_name: &'static str,
  stars:        i64,
  method:       &'static str,
}

const LAB_A: Lab = Lab {
  id:           1,
  name:         "Lab A",
  country_code: "US",
  country_name: "United States",
  stars:        2,
  method:       "clinical testing",
};
const LAB_B: Lab = Lab {
  id:           2,
  name:         "Lab B",
  country_code: "DE",
  country_name: "Germany",
  stars:        1,
  method:       "clinical testing",
};
const LAB_C: Lab = Lab {
  id:           3,
  name:         "Lab C",
  country_code: "US",
  country_name: "United States",
  stars:        0,
  method:       "research",
};

/// One lab's classification of one variant.
#[derive(Clone, Copy)]
struct Call {
  variant_id:   i64,
  variant:      &'static str,
  gene:         &'static str,
  lab:          Lab,
  significance: &'static str,
  condition:    &'static str,
  medgen_id:    &'static str,
}

impl Call {
  fn scv(&self) -> String { format!("SCV{:06}{:02}", self.variant_id, self.lab.id) }
}

const V1_A: Call = Call {
  variant_id:   101,
  variant:      "NM_007294.4(BRCA1):c.68_69del",
  gene:         "BRCA1",
  lab:          LAB_A,
  significance: "pathogenic",
  condition:    "Breast cancer",
  medgen_id:    "C0006142",
};
const V1_B: Call = Call { lab: LAB_B, significance: "likely pathogenic", ..V1_A };
// V1 is discordant: its comparisons sit at levels 2 and 5.
const V1_C: Call = Call { lab: LAB_C, significance: "benign", ..V1_A };
const V2_A: Call = Call {
  variant_id:   102,
  variant:      "NM_007294.4(BRCA1):c.4837A>G",
  gene:         "BRCA1",
  lab:          LAB_A,
  significance: "benign",
  condition:    "Breast cancer",
  medgen_id:    "C0006142",
};
const V3_B: Call = Call {
  variant_id:   201,
  variant:      "NM_000546.6(TP53):c.743G>A",
  gene:         "TP53",
  lab:          LAB_B,
  significance: "pathogenic",
  condition:    "Li-Fraumeni syndrome",
  medgen_id:    "C0085390",
};
const V3_C: Call = Call { lab: LAB_C, significance: "benign", ..V3_B };

const CURRENT_DATE: &str = "2024-01";
const EARLIER_DATE: &str = "2023-12";

fn insert_comparison(
  conn: &rusqlite::Connection,
  table: &str,
  date: &str,
  a: Call,
  b: Call,
  level: i64,
) {
  conn
    .execute(
      &format!(
        "INSERT INTO {table} (
           date, variant_name, rsid, gene, normalized_gene,
           submitter1_id, submitter1_name, submitter1_country_code, submitter1_country_name,
           scv1, significance1, normalized_significance1, star_level1,
           condition1_name, condition1_db, condition1_id, method1, standardized_method1,
           submitter2_id, submitter2_name, submitter2_country_code, submitter2_country_name,
           scv2, significance2, normalized_significance2, star_level2,
           condition2_name, condition2_db, condition2_id, method2, standardized_method2,
           conflict_level
         ) VALUES (
           ?1, ?2, NULL, ?3, ?3,
           ?4, ?5, ?6, ?7, ?8, ?9, ?9, ?10, ?11, 'MedGen', ?12, ?13, ?13,
           ?14, ?15, ?16, ?17, ?18, ?19, ?19, ?20, ?21, 'MedGen', ?22, ?23, ?23,
           ?24
         )"
      ),
      params![
        date,
        a.variant,
        a.gene,
        a.lab.id,
        a.lab.name,
        a.lab.country_code,
        a.lab.country_name,
        a.scv(),
        a.significance,
        a.lab.stars,
        a.condition,
        a.medgen_id,
        a.lab.method,
        b.lab.id,
        b.lab.name,
        b.lab.country_code,
        b.lab.country_name,
        b.scv(),
        b.significance,
        b.lab.stars,
        b.condition,
        b.medgen_id,
        b.lab.method,
        level,
      ],
    )
    .expect("insert comparison");
}

fn insert_submission(conn: &rusqlite::Connection, call: Call, xrefs: &str) {
  conn
    .execute(
      "INSERT INTO current_submissions (
         date, variant_id, variant_name, gene, normalized_gene,
         submitter_id, submitter_name, submitter_country_code, submitter_country_name,
         scv, significance, normalized_significance, star_level,
         condition_name, condition_xrefs, method, standardized_method
       ) VALUES (?1, ?2, ?3, ?4, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10, ?11, ?12, ?13, ?14, ?14)",
      params![
        CURRENT_DATE,
        call.variant_id,
        call.variant,
        call.gene,
        call.lab.id,
        call.lab.name,
        call.lab.country_code,
        call.lab.country_name,
        call.scv(),
        call.significance,
        call.lab.stars,
        call.condition,
        xrefs,
        call.lab.method,
      ],
    )
    .expect("insert submission");
}

/// Every submission appears unpaired; each pair appears in both directions.
fn seed_snapshot(conn: &rusqlite::Connection, table: &str, date: &str) {
  for call in [V1_A, V1_B, V1_C, V2_A, V3_B, V3_C] {
    insert_comparison(conn, table, date, call, call, -1);
  }
  for (a, b, level) in [(V1_A, V1_B, 2), (V1_A, V1_C, 5), (V1_B, V1_C, 5), (V3_B, V3_C, 5)] {
    insert_comparison(conn, table, date, a, b, level);
    insert_comparison(conn, table, date, b, a, level);
  }
}

fn seed(conn: &rusqlite::Connection) {
  seed_snapshot(conn, "current_comparisons", CURRENT_DATE);
  seed_snapshot(conn, "comparisons", CURRENT_DATE);

  let literature = Call {
    lab: Lab { method: "literature only", ..LAB_A },
    ..V2_A
  };
  insert_comparison(conn, "comparisons", EARLIER_DATE, literature, literature, -1);

  insert_submission(conn, V1_A, "");
  insert_submission(conn, V1_B, "MedGen:C0006142;OMIM:114480");
  insert_submission(conn, V1_C, "");
  insert_submission(conn, V2_A, "");
  insert_submission(conn, V3_B, "MedGen:C0085390");
  insert_submission(conn, V3_C, "");
}

struct Fixture {
  _dir:  TempDir,
  store: ClinvarStore,
}

async fn fixture() -> Fixture {
  let dir = tempfile::tempdir().expect("temp dir");
  let path = dir.path().join("clinvar.db");

  let store = ClinvarStore::open(&StoreConfig::new(&path)).await.expect("open store");
  store.init_schema().await.expect("init schema");

  let conn = rusqlite::Connection::open(&path).expect("fixture connection");
  seed(&conn);

  Fixture { _dir: dir, store }
}

fn all() -> MetricFilter { MetricFilter::default() }

fn failing_metric() -> Metric<i64> {
  let mut q = QueryBuilder::new();
  q.push("SELECT COUNT(*) FROM no_such_table");
  Metric::count(q.build("failing"))
}

/// Cross-tab rows carry no ordering of their own.
fn sorted_pairs<K: Ord>(
  mut rows: Vec<SignificancePairCount<K>>,
) -> Vec<SignificancePairCount<K>> {
  rows.sort_by(|a, b| (&a.key, &a.significance).cmp(&(&b.key, &b.significance)));
  rows
}

fn sorted_levels<K: Ord>(mut rows: Vec<LevelCount<K>>) -> Vec<LevelCount<K>> {
  rows.sort_by(|a, b| (&a.key, a.conflict_level).cmp(&(&b.key, b.conflict_level)));
  rows
}

// ─── Metrics ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn variants_by_gene_descending() {
  let f = fixture().await;

  let rows = f
    .store
    .run(metrics::total_variants_by_gene(&all().with_min_stars(0, 0)))
    .await
    .unwrap();

  assert_eq!(rows, vec![
    GeneCount {
      gene:            "BRCA1".into(),
      condition_count: 1,
      submitter_count: 3,
      count:           2,
    },
    GeneCount {
      gene:            "TP53".into(),
      condition_count: 1,
      submitter_count: 2,
      count:           1,
    },
  ]);
}

#[tokio::test]
async fn scalar_totals() {
  let f = fixture().await;
  let totals = f.store.totals(&all()).await.unwrap();

  assert_eq!(totals.max_date.as_deref(), Some(CURRENT_DATE));
  assert_eq!(totals.total_variants, 3);
  assert_eq!(totals.total_genes, 2);
  assert_eq!(totals.total_conditions, 2);
  assert_eq!(totals.total_submitters, 3);
  assert_eq!(totals.total_submissions, 6);
}

#[tokio::test]
async fn star_floor_narrows_both_sides() {
  let f = fixture().await;
  // Lab C's zero-star rows drop out; V1 and V3 survive through Lab B's rows.
  let n = f.store.run(metrics::total_variants(&all().with_min_stars(1, 1))).await.unwrap();
  assert_eq!(n, 3);
  let n = f.store.run(metrics::total_variants(&all().with_min_stars(2, 2))).await.unwrap();
  assert_eq!(n, 2);
}

#[tokio::test]
async fn singleton_set_matches_scalar() {
  let f = fixture().await;

  let scalar = all().with_submitter(Selector::one(LAB_B.id));
  let set = all().with_submitter(Selector::Many(vec![LAB_B.id]));

  assert_eq!(
    f.store.run(metrics::total_variants_by_gene(&scalar)).await.unwrap(),
    f.store.run(metrics::total_variants_by_gene(&set)).await.unwrap(),
  );
  assert_eq!(
    f.store.run(metrics::total_variants(&scalar)).await.unwrap(),
    f.store.run(metrics::total_variants(&set)).await.unwrap(),
  );
  assert_eq!(
    f.store.run(metrics::total_variants_by_submitter(&scalar)).await.unwrap(),
    f.store.run(metrics::total_variants_by_submitter(&set)).await.unwrap(),
  );
  assert_eq!(
    sorted_pairs(
      f.store.run(metrics::total_variants_by_submitter_and_significance(&scalar)).await.unwrap()
    ),
    sorted_pairs(
      f.store.run(metrics::total_variants_by_submitter_and_significance(&set)).await.unwrap()
    ),
  );
  assert_eq!(
    sorted_levels(
      f.store
        .run(metrics::total_variants_in_conflict_by_submitter_and_conflict_level(&scalar))
        .await
        .unwrap()
    ),
    sorted_levels(
      f.store
        .run(metrics::total_variants_in_conflict_by_submitter_and_conflict_level(&set))
        .await
        .unwrap()
    ),
  );

  let scalar = all().with_condition(Selector::one(V1_A.condition));
  let set = all().with_condition(Selector::many([V1_A.condition]));
  assert_eq!(
    f.store.run(metrics::total_variants_by_condition(&scalar)).await.unwrap(),
    f.store.run(metrics::total_variants_by_condition(&set)).await.unwrap(),
  );
  assert_eq!(
    sorted_pairs(
      f.store.run(metrics::total_variants_by_condition_and_significance(&scalar)).await.unwrap()
    ),
    sorted_pairs(
      f.store.run(metrics::total_variants_by_condition_and_significance(&set)).await.unwrap()
    ),
  );
  assert_eq!(
    sorted_levels(
      f.store
        .run(metrics::total_variants_in_conflict_by_condition_and_conflict_level(&scalar))
        .await
        .unwrap()
    ),
    sorted_levels(
      f.store
        .run(metrics::total_variants_in_conflict_by_condition_and_conflict_level(&set))
        .await
        .unwrap()
    ),
  );

  let scalar = all().with_gene(Selector::one("TP53"));
  let set = all().with_gene(Selector::many(["TP53"]));
  assert_eq!(
    f.store.run(metrics::variants(&scalar)).await.unwrap(),
    f.store.run(metrics::variants(&set)).await.unwrap(),
  );
}

#[tokio::test]
async fn singleton_submitter_set_groups_on_counterparts() {
  let f = fixture().await;
  let set = all().with_submitter(Selector::Many(vec![LAB_B.id]));

  let rows = f.store.run(metrics::total_variants_by_submitter(&set)).await.unwrap();
  let ids: Vec<(i64, i64)> = rows.iter().map(|r| (r.submitter_id, r.count)).collect();
  assert_eq!(ids, [(LAB_B.id, 2), (LAB_C.id, 2), (LAB_A.id, 1)]);
}

#[tokio::test]
async fn filters_only_narrow() {
  let f = fixture().await;
  let total = f.store.run(metrics::total_variants(&all())).await.unwrap();

  let gene = all().with_gene(Selector::one("BRCA1"));
  let by_gene = f.store.run(metrics::total_variants(&gene)).await.unwrap();
  let both = gene.clone().with_submitter(Selector::one(LAB_B.id));
  let by_both = f.store.run(metrics::total_variants(&both)).await.unwrap();

  assert_eq!((total, by_gene, by_both), (3, 2, 1));
}

#[tokio::test]
async fn raising_the_conflict_floor_never_increases_counts() {
  let f = fixture().await;

  let mut previous_total = i64::MAX;
  let mut previous_by_gene: Vec<GeneCount> = Vec::new();
  for floor in 0..=5 {
    let filter = all().with_min_conflict_level(floor);
    let total = f.store.run(metrics::total_variants(&filter)).await.unwrap();
    let by_gene = f.store.run(metrics::total_variants_by_gene(&filter)).await.unwrap();

    assert!(total <= previous_total, "floor {floor}: {total} > {previous_total}");
    for row in &by_gene {
      if let Some(before) = previous_by_gene.iter().find(|r| r.gene == row.gene) {
        assert!(row.count <= before.count, "floor {floor}, gene {}", row.gene);
      } else {
        assert!(floor == 0, "gene {} appeared at floor {floor}", row.gene);
      }
    }
    previous_total = total;
    previous_by_gene = by_gene;
  }
  // Both conflicting variants reach level 5.
  assert_eq!(previous_total, 2);
}

#[tokio::test]
async fn pinned_submitter_groups_on_counterparts() {
  let f = fixture().await;

  let pinned = all().with_submitter(Selector::one(LAB_B.id));
  let rows = f.store.run(metrics::total_variants_by_submitter(&pinned)).await.unwrap();
  let ids: Vec<(i64, i64)> = rows.iter().map(|r| (r.submitter_id, r.count)).collect();
  assert_eq!(ids, [(LAB_B.id, 2), (LAB_C.id, 2), (LAB_A.id, 1)]);

  let restricted = MetricFilter { submitter_ids: vec![LAB_A.id, LAB_C.id], ..pinned };
  let rows = f.store.run(metrics::total_variants_by_submitter(&restricted)).await.unwrap();
  let ids: Vec<i64> = rows.iter().map(|r| r.submitter_id).collect();
  assert_eq!(ids, [LAB_C.id, LAB_A.id]);
}

#[tokio::test]
async fn submissions_for_one_variant() {
  let f = fixture().await;
  let filter = MetricFilter { variant_name: Some(V1_A.variant.into()), ..all() };

  let rows = f.store.run(metrics::submissions(&filter)).await.unwrap();
  let labs: Vec<&str> = rows.iter().map(|r| r.submitter_name.as_str()).collect();
  assert_eq!(labs, ["Lab A", "Lab B", "Lab C"]);
  assert_eq!(rows[1].significance, "likely pathogenic");
  assert_eq!(rows[1].scv, V1_B.scv());
}

#[tokio::test]
async fn submission_counts() {
  let f = fixture().await;

  let by_country = f.store.run(metrics::total_submissions_by_country(&all())).await.unwrap();
  let countries: Vec<(&str, i64)> =
    by_country.iter().map(|r| (r.country_code.as_str(), r.count)).collect();
  assert_eq!(countries, [("US", 4), ("DE", 2)]);

  let us = MetricFilter { country_code: Some("US".into()), ..all() };
  let by_submitter = f.store.run(metrics::total_submissions_by_submitter(&us)).await.unwrap();
  let labs: Vec<(i64, i64)> = by_submitter.iter().map(|r| (r.submitter_id, r.count)).collect();
  assert_eq!(labs, [(LAB_A.id, 2), (LAB_C.id, 2)]);

  let by_method = f.store.run(metrics::total_submissions_by_method(&all())).await.unwrap();
  assert_eq!(by_method[0].method, "clinical testing");
  assert_eq!(by_method[0].count, 4);
}

#[tokio::test]
async fn without_significance_excludes_either_side() {
  let f = fixture().await;
  let n = f
    .store
    .run(metrics::total_variants_without_significance(&all(), "benign"))
    .await
    .unwrap();
  // V1 and V3 still count through their non-benign rows.
  assert_eq!(n, 2);
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lookups_find_existing_values() {
  let f = fixture().await;

  assert!(f.store.is_gene("BRCA1").await.unwrap());
  assert!(f.store.is_significance("benign").await.unwrap());
  assert!(f.store.is_condition_name("Li-Fraumeni syndrome").await.unwrap());
  assert!(f.store.is_variant_name(V3_B.variant).await.unwrap());
  assert_eq!(f.store.max_date().await.unwrap().as_deref(), Some(CURRENT_DATE));

  assert_eq!(
    f.store.submitter_info(LAB_B.id).await.unwrap(),
    Some(SubmitterInfo {
      id:           LAB_B.id,
      name:         "Lab B".into(),
      country_name: Some("Germany".into()),
    })
  );
  assert_eq!(
    f.store.condition_xrefs("Breast cancer").await.unwrap(),
    Some(vec!["MedGen:C0006142".to_owned(), "OMIM:114480".to_owned()])
  );
  assert_eq!(f.store.variant_info(V2_A.variant).await.unwrap().map(|v| v.id), Some(102));
  assert_eq!(f.store.country_name("DE").await.unwrap().as_deref(), Some("Germany"));
  assert_eq!(
    f.store.submitter_primary_method(LAB_C.id).await.unwrap().as_deref(),
    Some("research")
  );
}

#[tokio::test]
async fn lookups_report_missing_values_as_absent() {
  let f = fixture().await;

  assert!(!f.store.is_gene("NOTAGENE").await.unwrap());
  assert!(!f.store.is_significance("protective").await.unwrap());
  assert!(!f.store.is_condition_name("Nothing").await.unwrap());
  assert!(!f.store.is_variant_name("NM_0(X):c.1A>T").await.unwrap());
  assert_eq!(f.store.submitter_info(999).await.unwrap(), None);
  assert_eq!(f.store.condition_xrefs("Nothing").await.unwrap(), None);
  assert_eq!(f.store.variant_info("NM_0(X):c.1A>T").await.unwrap(), None);
  assert_eq!(f.store.country_name("ZZ").await.unwrap(), None);
  assert_eq!(f.store.submitter_primary_method(999).await.unwrap(), None);
}

#[tokio::test]
async fn empty_database_has_no_date() {
  let dir = tempfile::tempdir().unwrap();
  let store = ClinvarStore::open(&StoreConfig::new(dir.path().join("empty.db"))).await.unwrap();
  store.init_schema().await.unwrap();

  assert_eq!(store.max_date().await.unwrap(), None);
  assert_eq!(store.run(metrics::total_variants(&all())).await.unwrap(), 0);
}

// ─── Deferred dispatch ───────────────────────────────────────────────────────

#[tokio::test]
async fn one_failed_metric_fails_the_whole_request() {
  let f = fixture().await;

  let mut request = f.store.request();
  let first = request.defer(metrics::total_variants(&all()));
  let second = request.defer(metrics::total_variants_by_gene(&all()));
  let third = request.defer(failing_metric());
  let fourth = request.defer(metrics::total_variants_by_significance(&all()));
  let fifth = request.defer(metrics::total_genes(&all()));

  let err = request.finish().await.unwrap_err();
  assert!(matches!(&err, Error::Request(inner) if matches!(**inner, Error::Database(_))));

  assert!(matches!(first.get().await, Err(Error::Request(_))));
  assert!(matches!(second.get().await, Err(Error::Request(_))));
  assert!(matches!(third.get().await, Err(Error::Request(_))));
  assert!(matches!(fourth.get().await, Err(Error::Request(_))));
  assert!(matches!(fifth.get().await, Err(Error::Request(_))));

  // The others are fine on their own.
  assert_eq!(f.store.run(metrics::total_variants(&all())).await.unwrap(), 3);
}

#[tokio::test]
async fn handles_share_one_failure() {
  let f = fixture().await;

  let mut request = f.store.request();
  let ok = request.defer(metrics::total_variants(&all()));
  let bad = request.defer(failing_metric());
  assert!(request.finish().await.is_err());

  let (Err(Error::Request(a)), Err(Error::Request(b))) = (ok.get().await, bad.get().await) else {
    panic!("both handles should report the request failure");
  };
  assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn deferred_results_are_memoised() {
  let f = fixture().await;

  let mut request = f.store.request();
  let genes = request.defer(metrics::total_variants_by_gene(&all()));
  let copy = genes.clone();
  request.finish().await.unwrap();

  let a = genes.get().await.unwrap();
  let b = genes.get().await.unwrap();
  let c = copy.get().await.unwrap();
  assert!(Arc::ptr_eq(&a, &b));
  assert!(Arc::ptr_eq(&a, &c));
  assert_eq!(genes.metric(), "total_variants_by_gene");
}

#[tokio::test]
async fn handles_resolve_without_finishing() {
  let f = fixture().await;

  let mut request = f.store.request();
  let total = request.defer(metrics::total_variants(&all()));
  assert_eq!(*total.get().await.unwrap(), 3);
  request.finish().await.unwrap();
}

#[tokio::test]
async fn more_metrics_than_connections() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("clinvar.db");
  let mut config = StoreConfig::new(&path);
  config.pool_size = 2;
  let store = ClinvarStore::open(&config).await.unwrap();
  store.init_schema().await.unwrap();
  seed(&rusqlite::Connection::open(&path).unwrap());

  // Set filters create temp tables; sharing a connection between them would
  // clash on table names.
  let filter = all().with_submitter(Selector::Many(vec![LAB_A.id, LAB_B.id]));
  let mut request = store.request();
  let handles: Vec<_> = (0..8).map(|_| request.defer(metrics::total_variants(&filter))).collect();
  request.finish().await.unwrap();

  for handle in handles {
    assert_eq!(*handle.get().await.unwrap(), 3);
  }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn conflict_summary_by_gene_decomposes_tiers() {
  let f = fixture().await;
  let report = f.store.conflict_summary_by_gene(&all()).await.unwrap();

  assert_eq!(report.total_variants, 3);
  assert_eq!(report.total_potentially_conflicting_variants, 2);
  assert_eq!(report.total_conflicting_variants, 2);
  // V1 counts only at its highest level.
  assert_eq!(report.overview.get(&ConflictLevel::CONFIDENCE), None);
  assert_eq!(report.overview.get(&ConflictLevel::CLINICALLY_SIGNIFICANT), Some(&2));
  assert_eq!(report.overview.values().sum::<i64>(), report.total_conflicting_variants);

  let brca1 = report.summary.get(&"BRCA1".to_owned()).unwrap();
  assert_eq!(brca1.total, Some(2));
  assert_eq!(brca1.no_pair, Some(1));
  assert_eq!(brca1.pair_no_conflict, Some(0));
  assert_eq!(brca1.any_conflict, 1);
  assert_eq!(brca1.levels.get(&ConflictLevel::CLINICALLY_SIGNIFICANT), Some(&1));
  assert_eq!(brca1.level_total(), 1);
}

#[tokio::test]
async fn conflict_tiers_partition_every_total() {
  let f = fixture().await;

  let by_gene = f.store.conflict_summary_by_gene(&all()).await.unwrap();
  let by_submitter = f.store.conflict_summary_by_submitter(&all()).await.unwrap();
  let by_condition = f.store.conflict_summary_by_condition(&all()).await.unwrap();

  let check = |total: Option<i64>,
               no_pair: Option<i64>,
               pair_no_conflict: Option<i64>,
               any_conflict: i64,
               level_total: i64| {
    assert_eq!(no_pair.unwrap() + pair_no_conflict.unwrap() + any_conflict, total.unwrap());
    assert_eq!(any_conflict, level_total);
  };

  for t in &by_gene.summary.rows {
    check(t.total, t.no_pair, t.pair_no_conflict, t.any_conflict, t.level_total());
  }
  for t in &by_condition.summary.rows {
    check(t.total, t.no_pair, t.pair_no_conflict, t.any_conflict, t.level_total());
  }
  for t in &by_submitter.summary.rows {
    check(t.total, t.no_pair, t.pair_no_conflict, t.any_conflict, t.level_total());
    assert!(t.label.is_some());
  }
  assert_eq!(by_submitter.summary.rows.len(), 3);

  // Lab A's one variant is paired at levels 2 and 5.
  let lab_a = by_submitter.summary.get(&LAB_A.id).unwrap();
  assert_eq!(lab_a.any_conflict, 1);
  assert_eq!(lab_a.levels.len(), 1);
  assert_eq!(lab_a.levels.get(&ConflictLevel::CLINICALLY_SIGNIFICANT), Some(&1));

  let lab_b = by_submitter.summary.get(&LAB_B.id).unwrap();
  assert_eq!(lab_b.any_conflict, 2);
  assert_eq!(lab_b.levels.get(&ConflictLevel::CLINICALLY_SIGNIFICANT), Some(&2));
}

#[tokio::test]
async fn conflict_summary_by_condition_links_conditions() {
  let f = fixture().await;
  let report = f.store.conflict_summary_by_condition(&all()).await.unwrap();

  let breast = report.summary.get(&"Breast cancer".to_owned()).unwrap();
  assert_eq!(
    breast.xref,
    Some(ConditionXref { db: "MedGen".into(), id: "C0006142".into() })
  );

  // Pinned to one condition, the rows are its counterparts' conditions.
  let pinned = all().with_condition(Selector::one("Li-Fraumeni syndrome"));
  let report = f.store.conflict_summary_by_condition(&pinned).await.unwrap();
  let li_fraumeni = report.summary.get(&"Li-Fraumeni syndrome".to_owned()).unwrap();
  assert_eq!(li_fraumeni.xref.as_ref().map(|x| x.id.as_str()), Some("C0085390"));
}

#[tokio::test]
async fn raised_floor_only_narrows_the_conflicting_tier() {
  let f = fixture().await;
  // Without Lab C only the level-2 pair of V1 remains.
  let base = all().with_min_stars(1, 1);

  let default = f.store.conflict_summary_by_gene(&base).await.unwrap();
  let raised =
    f.store.conflict_summary_by_gene(&base.clone().with_min_conflict_level(5)).await.unwrap();

  assert_eq!((default.total_variants, raised.total_variants), (3, 3));
  assert_eq!(
    (default.total_potentially_conflicting_variants, raised.total_potentially_conflicting_variants),
    (1, 1)
  );
  assert_eq!((default.total_conflicting_variants, raised.total_conflicting_variants), (1, 0));
  assert!(default.summary.get(&"BRCA1".to_owned()).is_some());
  assert!(raised.summary.rows.is_empty());
}

#[tokio::test]
async fn significance_breakdown_partitions_totals() {
  let f = fixture().await;
  let ranker = SignificanceRanker::default();

  let breakdown = f.store.significance_breakdown_by_gene(&all(), &ranker).await.unwrap();

  for row in &breakdown.rows {
    assert_eq!(row.total, row.secondary_total(), "gene {}", row.key);
    assert!(row.variants <= row.total, "gene {}", row.key);
  }
  // V1 is called pathogenic, likely pathogenic and benign; V2 benign.
  let brca1 = breakdown.get(&"BRCA1".to_owned()).unwrap();
  assert_eq!(brca1.variants, 2);
  assert_eq!(brca1.total, 4);
  assert_eq!(brca1.counts.get("pathogenic"), Some(&1));
  assert_eq!(brca1.counts.get("likely pathogenic"), Some(&1));
  assert_eq!(brca1.counts.get("benign"), Some(&2));
  assert_eq!(breakdown.significances, ["pathogenic", "likely pathogenic", "benign"]);

  let tp53 = breakdown.get(&"TP53".to_owned()).unwrap();
  assert_eq!((tp53.variants, tp53.total), (1, 2));
}

#[tokio::test]
async fn significance_breakdown_by_submitter_carries_names() {
  let f = fixture().await;
  let ranker = SignificanceRanker::default();

  let breakdown = f.store.significance_breakdown_by_submitter(&all(), &ranker).await.unwrap();
  let lab_c = breakdown.get(&LAB_C.id).unwrap();
  assert_eq!(lab_c.label.as_deref(), Some("Lab C"));
  assert_eq!(lab_c.total, lab_c.secondary_total());
  assert_eq!(breakdown.significances, ["pathogenic", "likely pathogenic", "benign"]);
}

#[tokio::test]
async fn significance_overview_fills_the_baseline() {
  let f = fixture().await;
  let overview = f
    .store
    .significance_overview(&all(), &SignificanceRanker::default())
    .await
    .unwrap();

  let entries: Vec<(&str, i64)> =
    overview.entries.iter().map(|e| (e.significance.as_str(), e.count)).collect();
  assert_eq!(entries, [
    ("pathogenic", 2),
    ("likely pathogenic", 1),
    ("uncertain significance", 0),
    ("likely benign", 0),
    ("benign", 3),
  ]);
}

#[tokio::test]
async fn conflict_breakdown_sorts_both_axes() {
  let f = fixture().await;
  let breakdown = f
    .store
    .conflict_breakdown(&all(), &SignificanceRanker::default())
    .await
    .unwrap();

  assert_eq!(breakdown.significances1, ["pathogenic", "likely pathogenic", "benign"]);
  assert_eq!(breakdown.significances2, ["pathogenic", "likely pathogenic", "benign"]);
  let cell = breakdown.cell("pathogenic", "benign").unwrap();
  assert_eq!((cell.level, cell.count), (5, 2));
  assert!(breakdown.cell("benign", "benign").is_none());
}

#[tokio::test]
async fn method_history_is_zero_filled() {
  let f = fixture().await;
  let history = f.store.method_history(&all()).await.unwrap();

  assert_eq!(history.len(), 6);
  assert!(history.windows(2).all(|w| w[0].date <= w[1].date));
  let earlier_research = history
    .iter()
    .find(|r| r.date == EARLIER_DATE && r.standardized_method == "research")
    .unwrap();
  assert_eq!(earlier_research.count, 0);
  let current_clinical = history
    .iter()
    .find(|r| r.date == CURRENT_DATE && r.standardized_method == "clinical testing")
    .unwrap();
  assert_eq!(current_clinical.count, 4);
}
