//! The filter record accepted by every metric.
//!
//! Every field is optional. An absent field means "no constraint"; a present
//! field always narrows the result set. Set-valued fields accept either a
//! single scalar or a list, so `{"gene": "BRCA1"}` and
//! `{"genes": ["BRCA1", "TP53"]}` are both valid.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Selector ────────────────────────────────────────────────────────────────

/// A filter value: one scalar, or a set of scalars of the same type.
///
/// The element type is fixed by the field the selector sits in, so a set can
/// never mix integers and text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector<T> {
  One(T),
  Many(Vec<T>),
}

impl<T> Selector<T> {
  pub fn one(value: impl Into<T>) -> Self { Self::One(value.into()) }

  pub fn many<I>(values: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<T>,
  {
    Self::Many(values.into_iter().map(Into::into).collect())
  }

  /// The scalar, if this selector holds exactly one scalar (not a set).
  pub fn as_one(&self) -> Option<&T> {
    match self {
      Self::One(v) => Some(v),
      Self::Many(_) => None,
    }
  }

  /// True for a scalar or a set of exactly one value.
  pub fn is_single(&self) -> bool { self.values().len() == 1 }

  /// An empty set selects nothing in particular and is treated as absent.
  pub fn is_empty(&self) -> bool { matches!(self, Self::Many(v) if v.is_empty()) }

  pub fn values(&self) -> &[T] {
    match self {
      Self::One(v) => std::slice::from_ref(v),
      Self::Many(v) => v,
    }
  }
}

// ─── MetricFilter ────────────────────────────────────────────────────────────

/// The filter record for a metric call.
///
/// `min_conflict_level` is left `None` when the caller does not care; each
/// metric then applies its own default floor (see
/// [`MetricFilter::conflict_floor`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricFilter {
  pub min_stars1:           i64,
  pub min_stars2:           i64,
  pub standardized_method1: Option<String>,
  pub standardized_method2: Option<String>,
  pub min_conflict_level:   Option<i64>,

  /// Gene symbol(s); `""` selects intergenic variants.
  #[serde(alias = "genes")]
  pub gene:            Option<Selector<String>>,
  pub gene_type:       Option<i64>,
  #[serde(alias = "condition_name")]
  pub condition1_name: Option<Selector<String>>,
  #[serde(alias = "submitter_id")]
  pub submitter1_id:   Option<Selector<i64>>,
  pub submitter2_id:   Option<Selector<i64>>,
  /// Restricts the submitter a submitter-keyed metric groups on, whichever
  /// side that is.
  pub submitter_ids:   Vec<i64>,
  pub significance1:   Option<Selector<String>>,
  pub significance2:   Option<Selector<String>>,
  pub variant_name:    Option<String>,
  pub country_code:    Option<String>,

  /// Use raw significance terms instead of normalized ones.
  pub original_terms: bool,
  /// Use raw gene symbols instead of normalized ones.
  pub original_genes: bool,
}

impl MetricFilter {
  /// Parse a filter from JSON. Unknown keys and wrongly typed values are
  /// rejected rather than coerced.
  pub fn from_json(text: &str) -> Result<Self> {
    serde_json::from_str(text).map_err(|e| Error::MalformedFilter(e.to_string()))
  }

  /// The effective conflict-level floor, falling back to `default`.
  pub fn conflict_floor(&self, default: i64) -> i64 {
    self.min_conflict_level.unwrap_or(default)
  }

  pub fn with_min_conflict_level(mut self, level: i64) -> Self {
    self.min_conflict_level = Some(level);
    self
  }

  pub fn with_min_stars(mut self, min_stars1: i64, min_stars2: i64) -> Self {
    self.min_stars1 = min_stars1;
    self.min_stars2 = min_stars2;
    self
  }

  pub fn with_gene(mut self, gene: Selector<String>) -> Self {
    self.gene = Some(gene);
    self
  }

  pub fn with_condition(mut self, condition: Selector<String>) -> Self {
    self.condition1_name = Some(condition);
    self
  }

  pub fn with_submitter(mut self, submitter: Selector<i64>) -> Self {
    self.submitter1_id = Some(submitter);
    self
  }

  /// True when the side-1 condition filter pins a single condition, in which
  /// case condition-keyed metrics group on the other side of each pair. A
  /// one-element set pins exactly like the scalar it holds.
  pub fn pins_condition(&self) -> bool {
    self.condition1_name.as_ref().is_some_and(Selector::is_single)
  }

  /// True when the side-1 submitter filter pins a single submitter.
  pub fn pins_submitter(&self) -> bool {
    self.submitter1_id.as_ref().is_some_and(Selector::is_single)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scalar_and_set_selectors_parse() {
    let f = MetricFilter::from_json(r#"{"gene": "BRCA1", "submitter2_id": [1, 2]}"#).unwrap();
    assert_eq!(f.gene, Some(Selector::One("BRCA1".to_owned())));
    assert_eq!(f.submitter2_id, Some(Selector::Many(vec![1, 2])));
  }

  #[test]
  fn aliases_map_onto_canonical_keys() {
    let f = MetricFilter::from_json(
      r#"{"genes": ["TP53"], "condition_name": "Lynch syndrome", "submitter_id": 7}"#,
    )
    .unwrap();
    assert_eq!(f.gene, Some(Selector::Many(vec!["TP53".to_owned()])));
    assert!(f.pins_condition());
    assert!(f.pins_submitter());
  }

  #[test]
  fn wrong_element_type_fails_fast() {
    let err = MetricFilter::from_json(r#"{"submitter_ids": ["abc"]}"#).unwrap_err();
    assert!(matches!(err, Error::MalformedFilter(_)));

    let err = MetricFilter::from_json(r#"{"submitter1_id": [1, "two"]}"#).unwrap_err();
    assert!(matches!(err, Error::MalformedFilter(_)));
  }

  #[test]
  fn unknown_key_is_rejected() {
    assert!(MetricFilter::from_json(r#"{"colour": "red"}"#).is_err());
  }

  #[test]
  fn conflict_floor_defaults_per_metric() {
    let f = MetricFilter::default();
    assert_eq!(f.conflict_floor(-1), -1);
    assert_eq!(f.clone().with_min_conflict_level(3).conflict_floor(-1), 3);
  }

  #[test]
  fn singleton_set_pins_like_a_scalar() {
    let scalar = MetricFilter::default().with_submitter(Selector::one(7_i64));
    let set = MetricFilter::default().with_submitter(Selector::Many(vec![7]));
    assert!(scalar.pins_submitter());
    assert!(set.pins_submitter());

    let pair = MetricFilter::default().with_condition(Selector::many(["a", "b"]));
    assert!(!pair.pins_condition());
    let empty = MetricFilter::default().with_condition(Selector::Many(vec![]));
    assert!(!empty.pins_condition());
  }

  #[test]
  fn empty_set_is_empty() {
    assert!(Selector::<i64>::Many(vec![]).is_empty());
    assert!(!Selector::One(0_i64).is_empty());
    assert_eq!(Selector::One(4_i64).values(), &[4]);
  }
}
