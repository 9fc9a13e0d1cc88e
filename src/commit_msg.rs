// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Lifecycle of the commit-message scratch file: draft from a diff, edit, read back, discard
// role: scratch-file state
// inputs: working directory + file name, diff text, editor command line
// outputs: the message path and contents
// side_effects: creates/removes the scratch file; runs the operator's editor
// invariants:
// - draft creates the file exclusively; an existing file is stale state and is never overwritten
// - discard is idempotent
// errors: StaleScratchFile on draft over an existing file; EditorFailed on non-zero editor exit; IO errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::shell::{CommandLine, CommandRunner};

pub const COMMIT_MSG_FILE: &str = "commit-msg.txt";
pub const DEFAULT_EDITOR: &str = "vi";

/// `$EDITOR`, then `$VISUAL`, then `vi`.
pub fn editor_from_env() -> String {
  std::env::var("EDITOR")
    .ok()
    .filter(|s| !s.trim().is_empty())
    .or_else(|| std::env::var("VISUAL").ok().filter(|s| !s.trim().is_empty()))
    .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Build the editor invocation; extra words in the editor setting become arguments.
pub fn editor_command(editor: &str, file: &Path) -> CommandLine {
  let mut words = editor.split_whitespace();
  let program = words.next().unwrap_or(DEFAULT_EDITOR);
  CommandLine::new(program).args(words).arg(file.to_string_lossy())
}

pub struct CommitMessageFile {
  path: PathBuf,
}

impl CommitMessageFile {
  pub fn new<P: AsRef<Path>>(workdir: P, name: &str) -> Self {
    Self { path: workdir.as_ref().join(name) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  /// Create the file with `diff` as its initial content.
  pub fn draft(&self, diff: &[u8]) -> Result<()> {
    let mut fh = OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&self.path)
      .map_err(|e| match e.kind() {
        std::io::ErrorKind::AlreadyExists => TaskError::StaleScratchFile { path: self.path.display().to_string() },
        _ => TaskError::Io(e),
      })?;
    fh.write_all(diff)?;
    debug!(path = %self.path.display(), bytes = diff.len(), "drafted commit message");
    Ok(())
  }

  pub fn edit(&self, runner: &dyn CommandRunner, editor: &str) -> Result<()> {
    let cmd = editor_command(editor, &self.path);
    if runner.run_interactive(&cmd)? {
      Ok(())
    } else {
      Err(TaskError::EditorFailed { editor: editor.to_string() })
    }
  }

  /// Message text for display; bytes that are not UTF-8 are replaced.
  /// The commit itself reads the file, so nothing is lost there.
  pub fn read(&self) -> Result<String> {
    Ok(String::from_utf8_lossy(&std::fs::read(&self.path)?).into_owned())
  }

  /// Remove the file if present.
  pub fn discard(&self) -> Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => {
        info!("removed {}", self.path.display());
        Ok(())
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }
}
