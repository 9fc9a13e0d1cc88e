// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse line-oriented svn output: status listings, `svn list` entries, `svn propget` keyword lines
// role: parser
// inputs: raw stdout of `svn status -v`, `svn list`, `svn propget svn:keywords`
// outputs: ListingEntry vectors, entry names, KeywordMap
// invariants:
// - status: lines starting with '?' are untracked; the path is the last whitespace-delimited token (no spaces in paths)
// - list: listing order is kept; a trailing '/' directory marker is dropped
// - propget: one "path - kw kw" line per file; a single queried path gets the bare value
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{EntryStatus, KeywordMap, ListingEntry};

static PROPGET_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+-\s+").expect("valid regex"));

pub fn parse_status(text: &str) -> Vec<ListingEntry> {
  text
    .lines()
    .filter_map(|line| {
      let path = line.split_whitespace().last()?;
      let status = if line.starts_with('?') { EntryStatus::Untracked } else { EntryStatus::Tracked };
      Some(ListingEntry { path: path.to_string(), status })
    })
    .collect()
}

/// Tracked paths only, in listing order.
pub fn tracked_paths(text: &str) -> Vec<String> {
  parse_status(text)
    .into_iter()
    .filter(|e| e.status == EntryStatus::Tracked)
    .map(|e| e.path)
    .collect()
}

pub fn parse_list(text: &str) -> Vec<String> {
  text
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .map(|l| l.trim_end_matches('/').to_string())
    .collect()
}

fn keyword_set(value: &str) -> BTreeSet<String> {
  value.split_whitespace().map(str::to_string).collect()
}

pub fn parse_keywords(text: &str, queried: &[String]) -> KeywordMap {
  let mut map = KeywordMap::new();
  for line in text.lines() {
    let mut parts = PROPGET_SEPARATOR.splitn(line, 2);
    if let (Some(path), Some(keywords)) = (parts.next(), parts.next()) {
      map.insert(path.trim().to_string(), keyword_set(keywords));
    }
  }

  // svn omits the "path - " prefix when only one target is given
  if map.is_empty() && queried.len() == 1 && !text.trim().is_empty() {
    map.insert(queried[0].clone(), keyword_set(text));
  }

  map
}
