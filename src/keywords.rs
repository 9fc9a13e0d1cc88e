// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide which tracked files lack required svn:keywords and describe them for the operator
// role: keyword fix-up planning
// inputs: candidate paths, KeywordMap, required keyword set, file-name allow-list
// outputs: paths needing fix-up (listing order), report lines
// invariants:
// - a file needs fix-up iff its keyword set is not a superset of the required set (order-insensitive)
// - an absent KeywordMap entry counts as no keywords
// - running again after a fix-up proposes nothing
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::model::KeywordMap;

pub const DEFAULT_KEYWORDS: [&str; 5] = ["Date", "Rev", "Author", "URL", "Id"];
pub const DEFAULT_KEYWORD_PATTERN: &str = r"^(?:Rakefile|.*\.(?:rb|js|html|template))$";

pub fn default_keywords() -> Vec<String> {
  DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

/// Case-insensitive allow-list for files that should carry keywords.
pub fn keyword_filter(pattern: &str) -> Result<Regex, regex::Error> {
  RegexBuilder::new(pattern).case_insensitive(true).build()
}

pub fn find_missing_keywords<S: AsRef<str>>(files: &[S], kwmap: &KeywordMap, required: &[String]) -> Vec<String> {
  let required: BTreeSet<&str> = required.iter().map(String::as_str).collect();
  files
    .iter()
    .map(|f| f.as_ref())
    .filter(|path| {
      let current: BTreeSet<&str> = kwmap
        .get(*path)
        .map(|set| set.iter().map(String::as_str).collect())
        .unwrap_or_default();
      !current.is_superset(&required)
    })
    .map(str::to_string)
    .collect()
}

/// `  path: kw kw` per flagged file, `(no keywords)` when none are set.
pub fn describe(files: &[String], kwmap: &KeywordMap) -> Vec<String> {
  files
    .iter()
    .map(|f| {
      let current = match kwmap.get(f) {
        Some(set) if !set.is_empty() => set.iter().cloned().collect::<Vec<_>>().join(" "),
        _ => "(no keywords)".to_string(),
      };
      format!("  {}: {}", f, current)
    })
    .collect()
}
