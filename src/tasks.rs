// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run the named tasks (tag, release, commitlog, checkin, fix-keywords, ...) as query → plan → confirm → mutate
// role: processing/orchestrator
// inputs: EffectiveConfig, CommandRunner, Prompter, editor command, "now"
// outputs: optional stdout bytes per task (diff verbatim, log, info JSON); svn mutations through the runner
// side_effects: svn copy/commit/update/propset (suppressed in dry run); scratch file create/remove; editor and verify processes
// invariants:
// - no mutating svn command runs without a "yes" from the operator, except update
// - checkin runs update, verify, fix-keywords and commitlog first, in that order
// - the scratch file is removed only after a successful commit or by clean
// errors: any TaskError ends the task; nothing already executed is rolled back
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::cli::{EffectiveConfig, Task};
use crate::commit_msg::CommitMessageFile;
use crate::download;
use crate::error::{Result, TaskError};
use crate::keywords;
use crate::model::{ReleasePlan, TagPlan};
use crate::planner;
use crate::prompt::Prompter;
use crate::shell::{CommandLine, CommandRunner};
use crate::svn::{info, Svn};

const HERE: &str = ".";

pub struct Workflow<'a, R, W> {
  cfg: &'a EffectiveConfig,
  runner: &'a dyn CommandRunner,
  svn: Svn<'a>,
  prompter: Prompter<R, W>,
  editor: String,
  now: DateTime<Local>,
}

impl<'a, R: BufRead, W: Write> Workflow<'a, R, W> {
  pub fn new(
    cfg: &'a EffectiveConfig,
    runner: &'a dyn CommandRunner,
    prompter: Prompter<R, W>,
    editor: String,
    now: DateTime<Local>,
  ) -> Self {
    let svn = Svn::new(runner, &cfg.svn, cfg.layout.clone());
    Self { cfg, runner, svn, prompter, editor, now }
  }

  /// Run one task; `Some(bytes)` is meant for stdout.
  pub fn run(&mut self, task: &Task) -> Result<Option<Vec<u8>>> {
    match task {
      Task::Tag => self.tag().map(|_| None),
      Task::Release { version, version_file } => self.release(version.as_deref(), version_file.as_deref()).map(|_| None),
      Task::Commitlog => self.commitlog().map(|_| None),
      Task::ShowCommitlog => self.show_commitlog().map(Some),
      Task::Update => self.update().map(|_| None),
      Task::Checkin { targets, verify_cmd } => self.checkin(targets, verify_cmd.as_deref()).map(|_| None),
      Task::Clean => self.clean().map(|_| None),
      Task::FixKeywords => self.fix_keywords().map(|_| None),
      Task::Info => self.info().map(|v| Some(format!("{}\n", v).into_bytes())),
      Task::Log { start, finish } => self.svn.log(HERE, start, finish).map(|l| Some(l.into_bytes())),
      Task::Download { url, target } => {
        let target = Path::new(&self.cfg.workdir).join(target);
        download::download(url, &target).map(|_| None)
      }
    }
  }

  fn message_file(&self) -> CommitMessageFile {
    CommitMessageFile::new(&self.cfg.workdir, &self.cfg.message_file)
  }

  /// Confirm, then ask for the commit log. `~` means "no message", sent as an empty one.
  fn confirm_commit_log(&mut self, description: &str, default: &str) -> Result<String> {
    self.prompter.confirm_then(description, |p| {
      Ok(p.prompt_with_default("Commit log: ", Some(default), |_| true)?.unwrap_or_default())
    })
  }

  pub fn tag(&mut self) -> Result<TagPlan> {
    let root = self.svn.repo_root(HERE)?;
    let plan = planner::plan_tag(&root, &self.svn.layout, self.now);

    let msg = self.confirm_commit_log(&format!("Tagging trunk as {}", plan.target_url), "Tagging for code push")?;
    self.svn.copy(&msg, &plan.source_url, &plan.target_url)?;
    Ok(plan)
  }

  pub fn release(&mut self, version: Option<&str>, version_file: Option<&Path>) -> Result<ReleasePlan> {
    let version_file = version_file.map(|p| Path::new(&self.cfg.workdir).join(p));
    let version = planner::resolve_release_version(version, version_file.as_deref())?;

    let root = self.svn.repo_root(HERE)?;
    let releases = self.svn.list(&self.svn.layout.releases_url(&root))?;
    let tags = self.svn.list(&self.svn.layout.tags_url(&root))?;
    debug!(?releases, "releases");

    let plan = planner::plan_release(&root, &self.svn.layout, &version, &releases, &tags)?;
    debug!("No {} version currently exists", version);
    if let Some(prev) = &plan.latest_release {
      info!("latest release: {}", prev);
    }
    if let Some(tag) = &plan.latest_timestamp_tag {
      info!("latest timestamp tag: {}", tag);
    }

    let msg = self.confirm_commit_log(&format!("Tagging trunk as {}...", plan.target_url), "Branching for release")?;
    self.svn.copy(&msg, &plan.source_url, &plan.target_url)?;
    Ok(plan)
  }

  /// Draft the scratch file from the diff and hand it to the editor.
  pub fn commitlog(&mut self) -> Result<PathBuf> {
    let file = self.message_file();
    if file.exists() {
      return Err(TaskError::StaleScratchFile { path: file.path().display().to_string() });
    }
    let diff = self.svn.diff(&[])?;
    file.draft(&diff)?;
    file.edit(self.runner, &self.editor)?;
    Ok(file.path().to_path_buf())
  }

  pub fn show_commitlog(&self) -> Result<Vec<u8>> {
    self.svn.diff(&[])
  }

  pub fn update(&self) -> Result<()> {
    self.svn.update()
  }

  /// Run the pre-checkin verification command, if one is configured.
  pub fn verify(&self, command: Option<&str>) -> Result<()> {
    let Some(command) = command.filter(|c| !c.trim().is_empty()) else {
      debug!("no verification command configured");
      return Ok(());
    };
    let mut words = command.split_whitespace();
    let program = words.next().unwrap_or_default();
    let cmd = CommandLine::new(program).args(words);

    info!("Verifying with [{}]", cmd);
    if self.runner.run_interactive(&cmd)? {
      Ok(())
    } else {
      Err(TaskError::VerificationFailed { command: cmd.joined() })
    }
  }

  /// Returns the files that were flagged (and fixed, once confirmed).
  pub fn fix_keywords(&mut self) -> Result<Vec<String>> {
    info!("Checking subversion keywords...");
    let workdir = Path::new(&self.cfg.workdir);
    let paths: Vec<String> = self
      .svn
      .list_files(HERE)?
      .into_iter()
      .filter(|p| self.cfg.keyword_filter.is_match(p) && workdir.join(p).is_file())
      .collect();

    debug!("Looking at {} paths for keywords: {:?}", paths.len(), paths);
    let kwmap = self.svn.keywords(&paths)?;
    debug!(?kwmap, "keyword map");

    let flagged = keywords::find_missing_keywords(&paths, &kwmap, &self.cfg.keywords);
    if flagged.is_empty() {
      info!("Keywords are all up to date.");
      return Ok(flagged);
    }

    self.prompter.say("Files needing keyword fixes: ")?;
    for line in keywords::describe(&flagged, &kwmap) {
      self.prompter.say(&line)?;
    }
    self.prompter.confirm("Will add default keywords to these files.", true)?;
    self.svn.set_keywords(&self.cfg.keywords, &flagged)?;
    Ok(flagged)
  }

  pub fn checkin(&mut self, targets: &[String], verify_cmd: Option<&str>) -> Result<()> {
    self.update()?;
    self.verify(verify_cmd)?;
    self.fix_keywords()?;
    let path = self.commitlog()?;

    let file = self.message_file();
    let message = file.read()?;
    self.prompter.say(&format!("---\n{}\n---", message.trim_end()))?;

    self.prompter.confirm("Continue with checkin?", true)?;
    self.svn.commit(&path.to_string_lossy(), targets)?;
    file.discard()
  }

  pub fn clean(&self) -> Result<()> {
    self.message_file().discard()
  }

  /// svn info plus the values derived from it.
  pub fn info(&self) -> Result<serde_json::Value> {
    let vcs = self.svn.info(HERE)?;
    let relative_path = info::relative_path(&vcs.url, &vcs.repository_root)?;
    let latest_timestamp_tag = self.svn.latest_timestamp_tag(&vcs.repository_root)?;
    let latest_release_tag = self.svn.latest_release_tag(&vcs.repository_root)?;

    Ok(serde_json::json!({
      "info": vcs,
      "relative_path": relative_path,
      "layout": self.svn.layout,
      "latest_timestamp_tag": latest_timestamp_tag,
      "latest_release_tag": latest_release_tag,
      "next_tag": planner::make_timestamp_tag(self.now),
    }))
  }
}
