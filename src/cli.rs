use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::path::PathBuf;

use crate::commit_msg::COMMIT_MSG_FILE;
use crate::keywords::{self, DEFAULT_KEYWORD_PATTERN};
use crate::svn::Layout;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "svn-release",
    version,
    about = "Tag, release and check in Subversion working copies",
    long_about = None
)]
pub struct Cli {
  /// Working copy to operate on (default: current dir)
  #[arg(short = 'C', long, default_value = ".", global = true)]
  pub dir: PathBuf,

  /// svn client binary
  #[arg(long, default_value = "svn", global = true)]
  pub svn: String,

  /// Report mutating commands instead of running them
  #[arg(short = 'n', long, global = true)]
  pub dry_run: bool,

  /// Log every command and parsed value
  #[arg(short = 't', long, global = true)]
  pub trace: bool,

  /// Trunk directory under the repository root
  #[arg(long, default_value = "trunk", global = true)]
  pub trunk_dir: String,

  /// Timestamp tags directory under the repository root
  #[arg(long, default_value = "tags", global = true)]
  pub tags_dir: String,

  /// Release directory under the repository root
  #[arg(long, default_value = "branches", global = true)]
  pub releases_dir: String,

  /// Commit-message scratch file, relative to the working copy
  #[arg(long, default_value = COMMIT_MSG_FILE, global = true)]
  pub message_file: String,

  /// Required svn:keywords, space separated (default: "Date Rev Author URL Id")
  #[arg(long, global = true)]
  pub keywords: Option<String>,

  /// Case-insensitive pattern for files that must carry keywords
  #[arg(long, default_value = DEFAULT_KEYWORD_PATTERN, global = true)]
  pub keyword_pattern: String,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant used for tag names (hidden; tests only)
  #[arg(long = "now-override", hide = true, global = true)]
  pub now_override: Option<String>,

  #[command(subcommand)]
  pub command: Option<Task>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Task {
  /// Copy trunk to the tags directory under a timestamp name
  Tag,

  /// Copy trunk to the releases directory under VERSION
  Release {
    /// Version to release (default: read from --version-file)
    version: Option<String>,

    /// File holding a `VERSION = 'x.y.z'` assignment
    #[arg(long)]
    version_file: Option<PathBuf>,
  },

  /// Draft the commit message from the diff and open it in $EDITOR
  Commitlog,

  /// Print the un-edited commit log (the working copy diff)
  ShowCommitlog,

  /// Update the working copy (externals ignored)
  Update,

  /// Update, verify, fix keywords, edit the message and commit
  #[command(visible_aliases = ["commit", "ci"])]
  Checkin {
    /// Paths to commit (default: the whole working copy)
    targets: Vec<String>,

    /// Command that must succeed before committing, e.g. "cargo test"
    #[arg(long)]
    verify_cmd: Option<String>,
  },

  /// Remove the commit-message scratch file
  Clean,

  /// Add missing svn:keywords to tracked files that need them
  FixKeywords,

  /// Show svn info plus derived tag/release values as JSON
  Info,

  /// Print the svn log between two revisions
  Log {
    #[arg(long, default_value = "PREV")]
    start: String,

    #[arg(long, default_value = "HEAD")]
    finish: String,
  },

  /// Download URL into TARGET (follows up to 5 redirects)
  Download { url: String, target: PathBuf },
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub workdir: String, // absolute path for stability
  pub svn: String,
  pub dry_run: bool,
  pub trace: bool,
  pub layout: Layout,
  pub message_file: String,
  pub keywords: Vec<String>,
  pub keyword_filter: Regex,
  pub now_override: Option<String>,
  pub task: Task,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let task = match cli.command {
    Some(t) => t,
    None => bail!("Provide a task: tag, release, commitlog, show-commitlog, update, checkin, clean, fix-keywords, info, log or download"),
  };

  let keywords = match cli.keywords.as_deref() {
    Some(s) => s.split_whitespace().map(str::to_string).collect::<Vec<_>>(),
    None => keywords::default_keywords(),
  };
  if keywords.is_empty() {
    bail!("--keywords must name at least one keyword");
  }

  let keyword_filter = keywords::keyword_filter(&cli.keyword_pattern)
    .with_context(|| format!("invalid --keyword-pattern {:?}", cli.keyword_pattern))?;

  for (flag, value) in [("--trunk-dir", &cli.trunk_dir), ("--tags-dir", &cli.tags_dir), ("--releases-dir", &cli.releases_dir)] {
    if value.trim_matches('/').is_empty() {
      bail!("{} must not be empty", flag);
    }
  }

  let layout = Layout {
    trunk_dir: cli.trunk_dir.trim_matches('/').to_string(),
    tags_dir: cli.tags_dir.trim_matches('/').to_string(),
    releases_dir: cli.releases_dir.trim_matches('/').to_string(),
  };

  Ok(EffectiveConfig {
    workdir: util::canonicalize_lossy(&cli.dir),
    svn: cli.svn,
    dry_run: cli.dry_run,
    trace: cli.trace,
    layout,
    message_file: cli.message_file,
    keywords,
    keyword_filter,
    now_override: cli.now_override,
    task,
  })
}
