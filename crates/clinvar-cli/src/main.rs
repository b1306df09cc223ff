//! `clinvar-stats`: run one ClinVar statistics report and print it as JSON.
//!
//! # Usage
//!
//! ```text
//! clinvar-stats --config clinvar.toml conflict-summary --by gene
//! clinvar-stats significance-breakdown --by submitter --filter '{"min_stars1": 1}'
//! CLINVAR_DATABASE_PATH=clinvar.db clinvar-stats totals
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use clinvar_core::{filter::MetricFilter, significance::SignificanceRanker};
use clinvar_store_sqlite::{ClinvarStore, StoreConfig};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "clinvar-stats", version, about = "ClinVar variant-interpretation statistics")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "clinvar.toml")]
  config: PathBuf,

  /// Metric filter as a JSON object, e.g. `{"gene": "BRCA1"}`.
  #[arg(long, global = true, value_name = "JSON")]
  filter: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
  /// Per-key conflict tiers: total, potentially and actually conflicting.
  ConflictSummary {
    #[arg(long, value_enum)]
    by: Dimension,
  },
  /// Per-key variant counts split by clinical significance.
  SignificanceBreakdown {
    #[arg(long, value_enum)]
    by: Dimension,
  },
  /// Conflicting variants per pair of significances.
  ConflictBreakdown,
  /// Variant counts per significance.
  SignificanceOverview,
  /// Standardized-method submission counts per import date.
  MethodHistory,
  /// Headline counts for the current snapshot.
  Totals,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Dimension {
  Gene,
  Condition,
  Submitter,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the TOML config file and `CLINVAR_*` environment.
#[derive(Deserialize, Debug)]
struct AppConfig {
  #[serde(flatten)]
  store:                  StoreConfig,
  /// `nonstandard<TAB>canonical` significance terms.
  #[serde(default)]
  nonstandard_terms_path: Option<PathBuf>,
}

impl AppConfig {
  fn ranker(&self) -> anyhow::Result<SignificanceRanker> {
    let Some(path) = &self.nonstandard_terms_path else {
      return Ok(SignificanceRanker::default());
    };
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read term table {}", path.display()))?;
    SignificanceRanker::from_tsv(&text)
      .with_context(|| format!("failed to parse term table {}", path.display()))
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("CLINVAR").try_parsing(true))
    .build()
    .context("failed to read config file")?;
  let app: AppConfig = settings
    .try_deserialize()
    .context("failed to deserialise configuration")?;

  let filter = parse_filter(cli.filter.as_deref())?;
  let ranker = app.ranker()?;

  let store = ClinvarStore::open(&app.store)
    .await
    .with_context(|| format!("failed to open database at {:?}", app.store.database_path))?;

  let output = run(&store, &cli.command, &filter, &ranker)
    .await
    .with_context(|| format!("{:?} failed", cli.command))?;
  store.close();

  println!("{output}");
  Ok(())
}

fn parse_filter(raw: Option<&str>) -> anyhow::Result<MetricFilter> {
  match raw {
    Some(text) => MetricFilter::from_json(text).context("invalid --filter"),
    None => Ok(MetricFilter::default()),
  }
}

async fn run(
  store: &ClinvarStore,
  command: &Command,
  filter: &MetricFilter,
  ranker: &SignificanceRanker,
) -> anyhow::Result<String> {
  match command {
    Command::ConflictSummary { by: Dimension::Gene } => {
      to_json(&store.conflict_summary_by_gene(filter).await?)
    }
    Command::ConflictSummary { by: Dimension::Condition } => {
      to_json(&store.conflict_summary_by_condition(filter).await?)
    }
    Command::ConflictSummary { by: Dimension::Submitter } => {
      to_json(&store.conflict_summary_by_submitter(filter).await?)
    }
    Command::SignificanceBreakdown { by: Dimension::Gene } => {
      to_json(&store.significance_breakdown_by_gene(filter, ranker).await?)
    }
    Command::SignificanceBreakdown { by: Dimension::Condition } => {
      to_json(&store.significance_breakdown_by_condition(filter, ranker).await?)
    }
    Command::SignificanceBreakdown { by: Dimension::Submitter } => {
      to_json(&store.significance_breakdown_by_submitter(filter, ranker).await?)
    }
    Command::ConflictBreakdown => to_json(&store.conflict_breakdown(filter, ranker).await?),
    Command::SignificanceOverview => {
      to_json(&store.significance_overview(filter, ranker).await?)
    }
    Command::MethodHistory => to_json(&store.method_history(filter).await?),
    Command::Totals => to_json(&store.totals(filter).await?),
  }
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
  serde_json::to_string_pretty(value).context("failed to serialise report")
}
