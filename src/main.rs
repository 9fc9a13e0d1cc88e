use std::io::Write;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commit_msg;
mod download;
mod error;
mod keywords;
mod logging;
mod model;
mod planner;
mod prompt;
mod shell;
mod svn;
mod tasks;
mod util;

use crate::cli::{normalize, Cli};
use crate::prompt::Prompter;
use crate::shell::SystemRunner;
use crate::tasks::Workflow;

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;
  logging::init_logging(cfg.trace);
  tracing::debug!(?cfg, "effective config");

  // Phase 2: wire the runner, prompts and "now"
  let now = util::effective_now(util::parse_now_override(cfg.now_override.as_deref()));
  let runner = SystemRunner::new(&cfg.workdir, cfg.dry_run);
  let stdin = std::io::stdin();
  let prompter = Prompter::new(stdin.lock(), std::io::stderr());
  let mut workflow = Workflow::new(&cfg, &runner, prompter, commit_msg::editor_from_env(), now);

  // Phase 3: run the task
  match workflow.run(&cfg.task) {
    Ok(Some(out)) => {
      let mut stdout = std::io::stdout().lock();
      stdout.write_all(&out)?;
      stdout.flush()?;
      Ok(())
    }
    Ok(None) => Ok(()),
    // shown regardless of RUST_LOG
    Err(e) if e.is_user_abort() => {
      eprintln!("{}", e);
      std::process::exit(1);
    }
    Err(e) => Err(e.into()),
  }
}
