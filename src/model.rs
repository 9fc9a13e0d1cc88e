// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data parsed from svn output and the plans derived from it
// role: model/types
// outputs: Serializable structs for svn info, listings, keyword maps, tag candidates and plans
// invariants: VcsInfo is re-derived on every query; Version orders by numeric (major, minor, patch); KeywordMap holds only queried paths
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct VcsInfo {
  pub repository_root: String,
  pub url: String,
  pub revision: u64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_changed_revision: Option<u64>,
  /// Every `key: value` pair exactly as parsed, known keys included.
  pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
  Tracked,
  Untracked,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ListingEntry {
  pub path: String,
  pub status: EntryStatus,
}

/// Path → keyword names currently set in `svn:keywords`.
pub type KeywordMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagKey {
  /// `YYYYMMDD-HHMMSS`; fixed width, so string order is time order.
  Timestamp(String),
  Release(Version),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCandidate {
  pub name: String,
  pub key: TagKey,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct TagPlan {
  pub tag: String,
  pub source_url: String,
  pub target_url: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
  pub version: String,
  pub source_url: String,
  pub target_url: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub latest_release: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub latest_timestamp_tag: Option<String>,
}
