// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Parse `svn info` text (one `key: value` per line) into VcsInfo
// role: parser
// inputs: raw stdout of `svn info`
// outputs: VcsInfo with typed required fields and every pair retained verbatim
// invariants:
// - a line splits at its first colon; key and value are trimmed; blank lines are skipped
// - a non-blank line without a colon or with an empty key fails the whole parse
// - Repository Root, URL and Revision must be present
// errors: VcsQueryFailed for grammar or integer errors; MissingField for absent required keys
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use crate::error::{Result, TaskError};
use crate::model::VcsInfo;

pub const REPOSITORY_ROOT: &str = "Repository Root";
pub const URL: &str = "URL";
pub const REVISION: &str = "Revision";
pub const LAST_CHANGED_REV: &str = "Last Changed Rev";

/// Split one info line into `(key, value)`.
fn parse_line(line: &str) -> Result<(String, String)> {
  let (key, value) = line.split_once(':').ok_or_else(|| TaskError::VcsQueryFailed {
    reason: format!("expected 'key: value', got {:?}", line),
  })?;
  let key = key.trim();
  if key.is_empty() {
    return Err(TaskError::VcsQueryFailed { reason: format!("empty key in line {:?}", line) });
  }
  Ok((key.to_string(), value.trim().to_string()))
}

fn parse_rev(key: &str, value: &str) -> Result<u64> {
  value.parse::<u64>().map_err(|_| TaskError::VcsQueryFailed {
    reason: format!("{} is not a revision number: {:?}", key, value),
  })
}

pub fn parse_info(text: &str) -> Result<VcsInfo> {
  let mut fields = BTreeMap::new();
  for line in text.lines().filter(|l| !l.trim().is_empty()) {
    let (k, v) = parse_line(line)?;
    fields.insert(k, v);
  }

  let required = |key: &str| -> Result<String> {
    fields
      .get(key)
      .cloned()
      .ok_or_else(|| TaskError::MissingField { field: key.to_string() })
  };

  let repository_root = required(REPOSITORY_ROOT)?;
  let url = required(URL)?;
  let revision = parse_rev(REVISION, &required(REVISION)?)?;
  let last_changed_revision = match fields.get(LAST_CHANGED_REV) {
    Some(v) => Some(parse_rev(LAST_CHANGED_REV, v)?),
    None => None,
  };

  Ok(VcsInfo { repository_root, url, revision, last_changed_revision, fields })
}

/// `url` with `root/` stripped from the front.
pub fn relative_path(url: &str, root: &str) -> Result<String> {
  if url == root {
    return Ok(String::new());
  }
  let prefix = format!("{}/", root);
  url
    .strip_prefix(&prefix)
    .map(str::to_string)
    .ok_or_else(|| TaskError::NotUnderRoot { url: url.to_string(), root: root.to_string() })
}
