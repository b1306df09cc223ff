//! Conflict levels between the two sides of a comparison.
//!
//! A conflict level is a fixed ordinal from 0 (the two submissions agree) to
//! 5 (a clinically significant disagreement). Ordering is numeric.
//!
//! Comparison rows for submissions that have no partner carry the sentinel
//! level `-1`; it never becomes a [`ConflictLevel`] and only shows up as a
//! query floor.

use serde::{Deserialize, Serialize};

/// Floor that counts every record, paired or not.
pub const ALL_RECORDS: i64 = -1;
/// Floor that counts records with at least one pairing.
pub const PAIRED_RECORDS: i64 = 0;
/// Floor that counts records in actual conflict.
pub const CONFLICTING_RECORDS: i64 = 1;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ConflictLevel(u8);

impl ConflictLevel {
  pub const NONE: Self = Self(0);
  pub const SYNONYMOUS: Self = Self(1);
  pub const CONFIDENCE: Self = Self(2);
  pub const BENIGN_VS_UNCERTAIN: Self = Self(3);
  pub const CATEGORY: Self = Self(4);
  pub const CLINICALLY_SIGNIFICANT: Self = Self(5);

  pub const ALL: [Self; 6] = [
    Self::NONE,
    Self::SYNONYMOUS,
    Self::CONFIDENCE,
    Self::BENIGN_VS_UNCERTAIN,
    Self::CATEGORY,
    Self::CLINICALLY_SIGNIFICANT,
  ];

  /// `None` for anything outside 0–5, including the unpaired sentinel.
  pub fn new(level: i64) -> Option<Self> {
    u8::try_from(level).ok().filter(|l| *l <= 5).map(Self)
  }

  pub fn value(self) -> u8 { self.0 }

  pub fn is_conflict(self) -> bool { self.0 >= 1 }

  pub fn label(self) -> &'static str {
    match self.0 {
      0 => "no conflict",
      1 => "synonymous conflict",
      2 => "confidence conflict",
      3 => "benign vs uncertain conflict",
      4 => "category conflict",
      _ => "clinically significant conflict",
    }
  }
}

impl std::fmt::Display for ConflictLevel {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}
