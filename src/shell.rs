// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run external commands: mutating (dry-run aware), captured (read-only), interactive (editor, verify)
// role: process gateway
// inputs: CommandLine (program + args), working directory, dry-run flag
// outputs: unit on success, captured stdout, or exit success flag
// side_effects: spawns child processes; run/run_interactive inherit the terminal
// invariants:
// - run never executes when dry_run is set; it logs the command instead
// - capture is never suppressed by dry run; stdin stays attached so svn can ask for credentials
// - a non-zero exit from run/capture is CommandFailed carrying the joined command line
// errors: Spawn when the binary cannot be started; CommandFailed on non-zero exit
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Result, TaskError};

/// A program plus its arguments, kept separate so nothing goes through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
  pub program: String,
  pub args: Vec<String>,
}

impl CommandLine {
  pub fn new<S: Into<String>>(program: S) -> Self {
    Self { program: program.into(), args: Vec::new() }
  }

  pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  /// Plain space-joined form, as carried by `CommandFailed`.
  pub fn joined(&self) -> String {
    std::iter::once(self.program.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Trace form: arguments containing whitespace are quoted.
impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for a in &self.args {
      if a.chars().any(char::is_whitespace) {
        write!(f, " {:?}", a)?;
      } else {
        write!(f, " {}", a)?;
      }
    }
    Ok(())
  }
}

// --- Trait seam for process execution ---
pub trait CommandRunner {
  /// Run a mutating command with the terminal attached.
  fn run(&self, cmd: &CommandLine) -> Result<()>;
  /// Run a read-only command and return its stdout untouched.
  fn capture_bytes(&self, cmd: &CommandLine) -> Result<Vec<u8>>;
  /// `capture_bytes` decoded as text; invalid UTF-8 is replaced.
  fn capture(&self, cmd: &CommandLine) -> Result<String> {
    Ok(String::from_utf8_lossy(&self.capture_bytes(cmd)?).into_owned())
  }
  /// Run an interactive child (editor, verification) and report whether it succeeded.
  fn run_interactive(&self, cmd: &CommandLine) -> Result<bool>;
}

pub struct SystemRunner {
  workdir: PathBuf,
  dry_run: bool,
}

impl SystemRunner {
  pub fn new<P: AsRef<Path>>(workdir: P, dry_run: bool) -> Self {
    Self { workdir: workdir.as_ref().to_path_buf(), dry_run }
  }

  fn command(&self, cmd: &CommandLine) -> Command {
    let mut c = Command::new(&cmd.program);
    c.args(&cmd.args).current_dir(&self.workdir);
    c
  }

  fn spawn_error(cmd: &CommandLine, source: std::io::Error) -> TaskError {
    TaskError::Spawn { command: cmd.joined(), source }
  }
}

impl CommandRunner for SystemRunner {
  fn run(&self, cmd: &CommandLine) -> Result<()> {
    debug!(command = %cmd, "run");
    if self.dry_run {
      info!("(dry run mode) {}", cmd);
      return Ok(());
    }

    let status = self.command(cmd).status().map_err(|e| Self::spawn_error(cmd, e))?;
    if status.success() {
      Ok(())
    } else {
      Err(TaskError::CommandFailed { command: cmd.joined() })
    }
  }

  fn capture_bytes(&self, cmd: &CommandLine) -> Result<Vec<u8>> {
    debug!(command = %cmd, "capture");
    let out = self
      .command(cmd)
      .stdin(Stdio::inherit())
      .stderr(Stdio::inherit())
      .output()
      .map_err(|e| Self::spawn_error(cmd, e))?;

    if out.status.success() {
      Ok(out.stdout)
    } else {
      Err(TaskError::CommandFailed { command: cmd.joined() })
    }
  }

  fn run_interactive(&self, cmd: &CommandLine) -> Result<bool> {
    debug!(command = %cmd, "interactive");
    let status = self.command(cmd).status().map_err(|e| Self::spawn_error(cmd, e))?;
    Ok(status.success())
  }
}
