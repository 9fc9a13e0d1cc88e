// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Derive the next timestamp tag and plan releases from parsed tag/release listings
// role: planning (pure)
// inputs: listing entry names, repository root, Layout, target version, "now"
// outputs: TagCandidate selections, TagPlan, ReleasePlan
// invariants:
// - timestamp tags are exactly YYYYMMDD-HHMMSS and sort lexicographically
// - releases sort by numeric (major, minor, patch); "2.10.0" > "2.9.0"
// - malformed entries are skipped, never an error
// errors: ReleaseAlreadyExists when the target version is already listed; NoReleaseVersion when no version can be found
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TaskError};
use crate::model::{ReleasePlan, TagCandidate, TagKey, TagPlan, Version};
use crate::svn::Layout;

pub const TAG_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

static TAG_TIMESTAMP_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}-\d{6}$").expect("valid regex"));
static RELEASE_VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid regex"));
static VERSION_ASSIGNMENT: Lazy<Regex> =
  Lazy::new(|| Regex::new(r#"VERSION\s*=\s*['"](\d+\.\d+\.\d+)['"]"#).expect("valid regex"));

pub fn make_timestamp_tag(now: DateTime<Local>) -> String {
  now.format(TAG_TIMESTAMP_FORMAT).to_string()
}

pub fn parse_version(s: &str) -> Option<Version> {
  let caps = RELEASE_VERSION_PATTERN.captures(s)?;
  let n = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
  Some(Version { major: n(1)?, minor: n(2)?, patch: n(3)? })
}

pub fn timestamp_candidate(name: &str) -> Option<TagCandidate> {
  TAG_TIMESTAMP_PATTERN
    .is_match(name)
    .then(|| TagCandidate { name: name.to_string(), key: TagKey::Timestamp(name.to_string()) })
}

pub fn release_candidate(name: &str) -> Option<TagCandidate> {
  parse_version(name).map(|v| TagCandidate { name: name.to_string(), key: TagKey::Release(v) })
}

pub fn latest_timestamp_tag<S: AsRef<str>>(entries: &[S]) -> Option<String> {
  entries
    .iter()
    .filter_map(|e| timestamp_candidate(e.as_ref()))
    .map(|c| c.name)
    .max()
}

pub fn latest_release_tag<S: AsRef<str>>(entries: &[S]) -> Option<String> {
  entries
    .iter()
    .filter_map(|e| release_candidate(e.as_ref()))
    .filter_map(|c| match c.key {
      TagKey::Release(v) => Some((v, c.name)),
      TagKey::Timestamp(_) => None,
    })
    // ties on the version keep the later entry, like a stable sort + last
    .max_by(|a, b| a.0.cmp(&b.0))
    .map(|(_, name)| name)
}

pub fn plan_tag(repo_root: &str, layout: &Layout, now: DateTime<Local>) -> TagPlan {
  let tag = make_timestamp_tag(now);
  TagPlan {
    source_url: layout.trunk_url(repo_root),
    target_url: format!("{}/{}", layout.tags_url(repo_root), tag),
    tag,
  }
}

/// Plan copying trunk to `<releases>/<version>`.
///
/// `releases` and `tags` are the current entries of the releases and tags
/// directories. An existing entry named exactly `version` means the version
/// marker was not bumped since the last release.
pub fn plan_release<S: AsRef<str>>(
  repo_root: &str,
  layout: &Layout,
  version: &str,
  releases: &[S],
  tags: &[S],
) -> Result<ReleasePlan> {
  let releases_url = layout.releases_url(repo_root);
  let target_url = format!("{}/{}", releases_url, version);

  if releases.iter().any(|r| r.as_ref() == version) {
    return Err(TaskError::ReleaseAlreadyExists { version: version.to_string(), url: target_url });
  }

  Ok(ReleasePlan {
    version: version.to_string(),
    source_url: layout.trunk_url(repo_root),
    target_url,
    latest_release: latest_release_tag(releases),
    latest_timestamp_tag: latest_timestamp_tag(tags),
  })
}

/// First `VERSION = 'x.y.z'` assignment found in `text`.
pub fn version_from_source(text: &str) -> Option<String> {
  text
    .lines()
    .find_map(|l| VERSION_ASSIGNMENT.captures(l))
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_string())
}

/// The version to release: an explicit one wins, else the version file is searched.
pub fn resolve_release_version(explicit: Option<&str>, version_file: Option<&Path>) -> Result<String> {
  if let Some(v) = explicit {
    return Ok(v.to_string());
  }
  match version_file {
    Some(path) => {
      let text = std::fs::read_to_string(path)?;
      version_from_source(&text).ok_or(TaskError::NoReleaseVersion)
    }
    None => Err(TaskError::NoReleaseVersion),
  }
}
