// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failure kinds for every task; a decline is its own variant, not a crash
// role: errors/types
// outputs: TaskError enum and the crate-wide Result alias
// invariants: every variant is terminal for the current task invocation; UserAborted is distinguishable via is_user_abort
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

/// Errors that end a task invocation.
#[derive(Error, Debug)]
pub enum TaskError {
  /// External process exited non-zero.
  #[error("Command failed: [{command}]")]
  CommandFailed { command: String },

  /// External process could not be started at all.
  #[error("could not start [{command}]: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  /// `svn info` failed or produced text outside the `key: value` grammar.
  #[error("svn query failed: {reason}")]
  VcsQueryFailed { reason: String },

  /// A required `svn info` field was absent.
  #[error("svn info output is missing the '{field}' field")]
  MissingField { field: String },

  #[error("URL {url} is not under the repository root {root}")]
  NotUnderRoot { url: String, root: String },

  #[error("No differences.")]
  NoDifferences,

  #[error("No log between {start} and {finish}.")]
  NoLog { start: String, finish: String },

  #[error("Version {version} already has a release ({url}). Did you mean to increment the version?")]
  ReleaseAlreadyExists { version: String, url: String },

  #[error("no release version given and none found in the version file")]
  NoReleaseVersion,

  /// Operator answered "no" to a confirmation that aborts on decline.
  #[error("Aborted.")]
  UserAborted,

  #[error("Editor exited uncleanly ({editor}).")]
  EditorFailed { editor: String },

  /// Scratch file left behind by an interrupted run; `clean` removes it.
  #[error("{path} already exists; run `clean` to discard it")]
  StaleScratchFile { path: String },

  #[error("verification command failed: [{command}]")]
  VerificationFailed { command: String },

  #[error("download of {url} failed: {reason}")]
  Download { url: String, reason: String },

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl TaskError {
  pub fn is_user_abort(&self) -> bool {
    matches!(self, TaskError::UserAborted)
  }
}

pub type Result<T> = std::result::Result<T, TaskError>;
