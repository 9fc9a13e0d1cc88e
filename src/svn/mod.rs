// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed wrapper over the svn client: read-only queries parsed into the model, mutating commands routed through run
// role: vcs client
// inputs: CommandRunner, svn binary name, repository Layout
// outputs: VcsInfo, listings, KeywordMap, diff/log text; executes copy/commit/update/propset
// side_effects: spawns svn; mutating calls are suppressed in dry run by the runner
// invariants:
// - every query re-runs svn; nothing is cached between calls
// - keyword lookups for N paths cost exactly one svn invocation (zero when N = 0)
// errors: info failures surface as VcsQueryFailed; empty diff is NoDifferences; empty log is NoLog
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod info;
pub mod listing;

use tracing::debug;

use crate::error::{Result, TaskError};
use crate::model::{KeywordMap, VcsInfo};
use crate::planner;
use crate::shell::{CommandLine, CommandRunner};

/// Conventional directories under the repository root.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Layout {
  pub trunk_dir: String,
  pub tags_dir: String,
  pub releases_dir: String,
}

impl Default for Layout {
  fn default() -> Self {
    Self { trunk_dir: "trunk".into(), tags_dir: "tags".into(), releases_dir: "branches".into() }
  }
}

impl Layout {
  pub fn trunk_url(&self, root: &str) -> String {
    format!("{}/{}", root, self.trunk_dir)
  }

  pub fn tags_url(&self, root: &str) -> String {
    format!("{}/{}", root, self.tags_dir)
  }

  pub fn releases_url(&self, root: &str) -> String {
    format!("{}/{}", root, self.releases_dir)
  }
}

pub struct Svn<'a> {
  runner: &'a dyn CommandRunner,
  binary: String,
  pub layout: Layout,
}

impl<'a> Svn<'a> {
  pub fn new(runner: &'a dyn CommandRunner, binary: &str, layout: Layout) -> Self {
    Self { runner, binary: binary.to_string(), layout }
  }

  fn cmd(&self, subcommand: &str) -> CommandLine {
    CommandLine::new(self.binary.as_str()).arg(subcommand)
  }

  pub fn info(&self, dir: &str) -> Result<VcsInfo> {
    let out = self.runner.capture(&self.cmd("info").arg(dir)).map_err(|e| match e {
      TaskError::CommandFailed { command } => TaskError::VcsQueryFailed { reason: format!("[{}] exited non-zero", command) },
      other => other,
    })?;
    let parsed = info::parse_info(&out)?;
    debug!(root = %parsed.repository_root, url = %parsed.url, rev = parsed.revision, "svn info");
    Ok(parsed)
  }

  pub fn repo_root(&self, dir: &str) -> Result<String> {
    Ok(self.info(dir)?.repository_root)
  }

  #[allow(dead_code)]
  pub fn url(&self, dir: &str) -> Result<String> {
    Ok(self.info(dir)?.url)
  }

  #[allow(dead_code)]
  pub fn revision(&self, dir: &str) -> Result<u64> {
    Ok(self.info(dir)?.revision)
  }

  #[allow(dead_code)]
  pub fn last_changed_revision(&self, dir: &str) -> Result<u64> {
    self
      .info(dir)?
      .last_changed_revision
      .ok_or_else(|| TaskError::MissingField { field: info::LAST_CHANGED_REV.to_string() })
  }

  /// Path of `dir` below the repository root, e.g. `trunk/lib`.
  #[allow(dead_code)]
  pub fn relative_path(&self, dir: &str) -> Result<String> {
    let i = self.info(dir)?;
    info::relative_path(&i.url, &i.repository_root)
  }

  /// Tracked paths under `dir`; untracked (`?`) entries are left out.
  pub fn list_files(&self, dir: &str) -> Result<Vec<String>> {
    let out = self.runner.capture(&self.cmd("status").args(["-v", "--ignore-externals", dir]))?;
    Ok(listing::tracked_paths(&out))
  }

  pub fn list(&self, url: &str) -> Result<Vec<String>> {
    let out = self.runner.capture(&self.cmd("list").arg(url))?;
    let entries = listing::parse_list(&out);
    debug!(url, ?entries, "svn list");
    Ok(entries)
  }

  pub fn keywords(&self, paths: &[String]) -> Result<KeywordMap> {
    if paths.is_empty() {
      return Ok(KeywordMap::new());
    }
    let out = self.runner.capture(&self.cmd("propget").arg("svn:keywords").args(paths.iter().cloned()))?;
    Ok(listing::parse_keywords(&out, paths))
  }

  /// Raw diff bytes; source files are not necessarily UTF-8.
  pub fn diff(&self, targets: &[String]) -> Result<Vec<u8>> {
    debug!(?targets, "getting svn diff");
    let out = self.runner.capture_bytes(&self.cmd("diff").args(targets.iter().cloned()))?;
    if out.is_empty() {
      return Err(TaskError::NoDifferences);
    }
    Ok(out)
  }

  pub fn log(&self, dir: &str, start: &str, finish: &str) -> Result<String> {
    let out = self.runner.capture(&self.cmd("log").arg(format!("-r{}:{}", start, finish)).arg(dir))?;
    if out.is_empty() {
      return Err(TaskError::NoLog { start: start.to_string(), finish: finish.to_string() });
    }
    Ok(out)
  }

  /// URL of the newest timestamp tag, if any.
  pub fn latest_timestamp_tag(&self, root: &str) -> Result<Option<String>> {
    let tags_url = self.layout.tags_url(root);
    let entries = self.list(&tags_url)?;
    Ok(planner::latest_timestamp_tag(&entries).map(|t| format!("{}/{}", tags_url, t)))
  }

  /// URL of the highest `major.minor.patch` release, if any.
  pub fn latest_release_tag(&self, root: &str) -> Result<Option<String>> {
    let releases_url = self.layout.releases_url(root);
    let entries = self.list(&releases_url)?;
    Ok(planner::latest_release_tag(&entries).map(|t| format!("{}/{}", releases_url, t)))
  }

  pub fn copy(&self, message: &str, source: &str, target: &str) -> Result<()> {
    self.runner.run(&self.cmd("copy").args(["-m", message, source, target]))
  }

  pub fn commit(&self, message_file: &str, targets: &[String]) -> Result<()> {
    self.runner.run(&self.cmd("commit").args(["-F", message_file]).args(targets.iter().cloned()))
  }

  pub fn update(&self) -> Result<()> {
    self.runner.run(&self.cmd("update").arg("--ignore-externals"))
  }

  /// One propset over every file, not one per file.
  pub fn set_keywords(&self, keywords: &[String], files: &[String]) -> Result<()> {
    self.runner.run(
      &self
        .cmd("propset")
        .args(["svn:keywords".to_string(), keywords.join(" ")])
        .args(files.iter().cloned()),
    )
  }
}
