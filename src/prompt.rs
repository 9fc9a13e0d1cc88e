// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Line-based operator prompts (free text, defaulted, yes/no confirmation) over injected input/output streams
// role: interaction
// inputs: any BufRead for answers, any Write for prompts and messages
// outputs: validated responses; confirmation decisions
// invariants:
// - prompts repeat until the validator accepts; "~" bypasses validation and means "no value"
// - end of input is an empty answer; if that cannot be accepted the prompt fails with UserAborted
// - confirm with abort_on_decline turns "no" into UserAborted
// errors: UserAborted; IO errors from the streams
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{Result, TaskError};

const FAILURE_MSG: &str = "Try again.";
const NO_VALUE: &str = "~";

pub struct Prompter<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  #[cfg(test)]
  pub fn output(&self) -> &W {
    &self.output
  }

  /// Write a line of operator-facing text.
  pub fn say(&mut self, msg: &str) -> Result<()> {
    writeln!(self.output, "{}", msg)?;
    Ok(())
  }

  /// `None` at end of input.
  fn read_answer(&mut self) -> Result<Option<String>> {
    let mut line = String::new();
    if self.input.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
  }

  fn ask(&mut self, label: &str) -> Result<Option<String>> {
    let mut label = label.trim_end().to_string();
    if label.chars().last().is_some_and(char::is_alphanumeric) {
      label.push(':');
    }
    write!(self.output, "{} ", label)?;
    self.output.flush()?;
    self.read_answer()
  }

  /// Ask until `validate` accepts the trimmed response.
  #[allow(dead_code)]
  pub fn prompt<F>(&mut self, label: &str, validate: F) -> Result<String>
  where
    F: Fn(&str) -> bool,
  {
    loop {
      let (response, eof) = match self.ask(label)? {
        Some(r) => (r, false),
        None => (String::new(), true),
      };
      if validate(&response) {
        return Ok(response);
      }
      if eof {
        return Err(TaskError::UserAborted);
      }
      writeln!(self.output, "{}\n", FAILURE_MSG)?;
    }
  }

  /// Ask with a default shown in brackets; empty input takes the default.
  ///
  /// Answering `~` skips validation and yields `None`.
  pub fn prompt_with_default<F>(&mut self, label: &str, default: Option<&str>, validate: F) -> Result<Option<String>>
  where
    F: Fn(&str) -> bool,
  {
    let default = default.unwrap_or(NO_VALUE);
    let label = format!("{} [{}]:", label.trim_end().trim_end_matches(':'), default);
    loop {
      let (response, eof) = match self.ask(&label)? {
        Some(r) if r.is_empty() => (default.to_string(), false),
        Some(r) => (r, false),
        None => (default.to_string(), true),
      };
      debug!(?response, "validating response");

      if response == NO_VALUE {
        return Ok(None);
      }
      if validate(&response) {
        return Ok(Some(response));
      }
      if eof {
        return Err(TaskError::UserAborted);
      }
      writeln!(self.output, "{}\n", FAILURE_MSG)?;
    }
  }

  /// Show `description` and ask for a y/n answer (default no).
  ///
  /// Returns `Ok(true)` on yes. On no: `Err(UserAborted)` when
  /// `abort_on_decline`, else `Ok(false)`.
  pub fn confirm(&mut self, description: &str, abort_on_decline: bool) -> Result<bool> {
    self.say(description)?;
    let answer = self.prompt_with_default("Continue?", Some("n"), |input| {
      input.chars().next().is_some_and(|c| matches!(c.to_ascii_lowercase(), 'y' | 'n'))
    })?;

    let yes = answer.as_deref().is_some_and(|a| a.to_ascii_lowercase().starts_with('y'));
    if yes {
      Ok(true)
    } else if abort_on_decline {
      Err(TaskError::UserAborted)
    } else {
      Ok(false)
    }
  }

  /// Run `action` only if the operator confirms; a decline aborts.
  pub fn confirm_then<T, F>(&mut self, description: &str, action: F) -> Result<T>
  where
    F: FnOnce(&mut Self) -> Result<T>,
  {
    self.confirm(description, true)?;
    action(self)
  }
}
