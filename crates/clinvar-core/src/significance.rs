//! Domain ranking of clinical significance terms.
//!
//! Terms are ranked by their position in [`CANONICAL_SIGNIFICANCES`] after
//! passing through a nonstandard-term table. Terms that are still unknown
//! after mapping rank after "benign" and before "other", all sharing one
//! rank, so a stable sort keeps them in whatever order they arrived in.

use std::collections::HashMap;

use crate::{Error, Result};

/// Canonical buckets, most to least severe.
pub const CANONICAL_SIGNIFICANCES: [&str; 7] = [
  "pathogenic",
  "likely pathogenic",
  "uncertain significance",
  "likely benign",
  "benign",
  "other",
  "not provided",
];

/// The five buckets every significance overview starts from.
pub const OVERVIEW_SIGNIFICANCES: [&str; 5] = [
  "pathogenic",
  "likely pathogenic",
  "uncertain significance",
  "likely benign",
  "benign",
];

const BUILTIN_NONSTANDARD_TERMS: &[(&str, &str)] = &[
  ("pathologic", "pathogenic"),
  ("mutation", "pathogenic"),
  ("probably pathogenic", "likely pathogenic"),
  ("probable-pathogenic", "likely pathogenic"),
  ("suspected pathogenic", "likely pathogenic"),
  ("uncertain", "uncertain significance"),
  ("unknown significance", "uncertain significance"),
  ("variant of unknown significance", "uncertain significance"),
  ("variant of uncertain significance", "uncertain significance"),
  ("vus", "uncertain significance"),
  ("probably not pathogenic", "likely benign"),
  ("probable-non-pathogenic", "likely benign"),
  ("likely non-pathogenic", "likely benign"),
  ("non-pathogenic", "benign"),
  ("nonpathogenic", "benign"),
  ("polymorphism", "benign"),
  ("unknown", "not provided"),
  ("no known pathogenicity", "not provided"),
];

/// Sort key for a significance term. Canonical position `i` maps to `2 * i`;
/// unrecognized terms share the odd rank just below "other".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignificanceRank(u8);

impl SignificanceRank {
  const UNRANKED: Self = Self(2 * (CANONICAL_SIGNIFICANCES.len() as u8 - 2) - 1);

  pub fn is_canonical(self) -> bool { self.0 % 2 == 0 }
}

/// Immutable ranking table, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct SignificanceRanker {
  nonstandard: HashMap<String, String>,
}

impl Default for SignificanceRanker {
  fn default() -> Self {
    Self::new(
      BUILTIN_NONSTANDARD_TERMS
        .iter()
        .map(|(from, to)| ((*from).to_owned(), (*to).to_owned())),
    )
  }
}

impl SignificanceRanker {
  pub fn new(nonstandard: impl IntoIterator<Item = (String, String)>) -> Self {
    Self { nonstandard: nonstandard.into_iter().collect() }
  }

  /// Parse a `nonstandard<TAB>canonical` table. Blank lines are skipped.
  pub fn from_tsv(text: &str) -> Result<Self> {
    let mut nonstandard = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
      if line.trim().is_empty() {
        continue;
      }
      let Some((from, to)) = line.split_once('\t') else {
        return Err(Error::MalformedTermTable {
          line:   idx + 1,
          reason: "expected two tab-separated columns".to_owned(),
        });
      };
      nonstandard.insert(from.to_owned(), to.trim_end_matches('\r').to_owned());
    }
    Ok(Self { nonstandard })
  }

  /// The canonical form of `term`, or `term` itself if it is not in the
  /// nonstandard table.
  pub fn canonical<'a>(&'a self, term: &'a str) -> &'a str {
    self.nonstandard.get(term).map_or(term, String::as_str)
  }

  pub fn rank(&self, term: &str) -> SignificanceRank {
    let canonical = self.canonical(term);
    CANONICAL_SIGNIFICANCES
      .iter()
      .position(|c| *c == canonical)
      .map_or(SignificanceRank::UNRANKED, |i| SignificanceRank(2 * i as u8))
  }

  /// Sort terms alphabetically, then stably by rank, so unranked terms come
  /// out in a deterministic order.
  pub fn sort_terms(&self, terms: &mut [String]) {
    terms.sort();
    terms.sort_by_key(|t| self.rank(t));
  }

  /// Same ordering as [`sort_terms`](Self::sort_terms) for keyed entries.
  pub fn sort_entries<V>(&self, entries: &mut [(String, V)]) {
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.sort_by_key(|(t, _)| self.rank(t));
  }
}
