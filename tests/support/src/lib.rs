//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Then in tests:
//! ```rust,no_run
//! use test_support::FakeSvn;
//!
//! let svn = FakeSvn::new();
//! svn.respond("info", "URL: svn://h/r/trunk\nRepository Root: svn://h/r\nRevision: 1\n");
//! svn.command(&["info"]).assert().success();
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::{Path, PathBuf};
use std::io::Write;

pub const BIN: &str = "svn-release";

pub const TRUNK_INFO: &str = "\
Path: .
URL: svn://svn.example.com/project/trunk
Repository Root: svn://svn.example.com/project
Repository UUID: 7a3e0f0e-1c5f-0410-8f8b-8a5c3c2e3b11
Revision: 1042
Node Kind: directory
Schedule: normal
Last Changed Author: ged
Last Changed Rev: 1040
Last Changed Date: 2008-04-02 09:05:07 -0700 (Wed, 02 Apr 2008)
";

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

/// Stand-in `svn` client: a shell script that records every invocation and
/// answers read-only subcommands from canned files.
///
/// `list <url>` answers from `list-<last url segment>`; every other
/// subcommand answers from a file named after it. `fail(sub)` makes that
/// subcommand exit 1. `ask_credentials(sub)` makes it read one line from
/// stdin first, failing like an unauthenticated svn on EOF. Mutating
/// subcommands just get recorded.
pub struct FakeSvn {
    state: tempfile::TempDir,
    workdir: tempfile::TempDir,
}

const SCRIPT: &str = r#"#!/bin/sh
state='@STATE@'
printf '%s\n' "$*" >> "$state/calls.log"
sub="$1"
if [ -e "$state/fail-$sub" ]; then
  exit 1
fi
if [ -e "$state/ask-$sub" ]; then
  if ! read password; then
    echo "svn: E215004: Authentication failed" >&2
    exit 1
  fi
fi
case "$sub" in
  list) key="list-$(basename "$2")" ;;
  *) key="$sub" ;;
esac
if [ -f "$state/$key" ]; then
  cat "$state/$key"
fi
exit 0
"#;

impl FakeSvn {
    pub fn new() -> Self {
        let state = tempdir();
        let workdir = tempdir();
        let script = state.path().join("svn");
        {
            let mut fh = fs::File::create(&script).expect("create fake svn");
            fh.write_all(SCRIPT.replace("@STATE@", &state.path().to_string_lossy()).as_bytes())
                .expect("write fake svn");
        }
        make_executable(&script);
        Self { state, workdir }
    }

    /// Fake working copy the binary runs in.
    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    pub fn binary(&self) -> PathBuf {
        self.state.path().join("svn")
    }

    pub fn respond(&self, subcommand: &str, stdout: &str) -> &Self {
        self.respond_bytes(subcommand, stdout.as_bytes())
    }

    pub fn respond_bytes(&self, subcommand: &str, stdout: &[u8]) -> &Self {
        fs::write(self.state.path().join(subcommand), stdout).expect("write canned output");
        self
    }

    /// Entries for `svn list <root>/<dir>`.
    pub fn respond_list(&self, dir: &str, stdout: &str) -> &Self {
        self.respond(&format!("list-{}", dir), stdout)
    }

    pub fn fail(&self, subcommand: &str) -> &Self {
        self.respond(&format!("fail-{}", subcommand), "")
    }

    /// Make `subcommand` prompt for a password on stdin before answering.
    pub fn ask_credentials(&self, subcommand: &str) -> &Self {
        self.respond(&format!("ask-{}", subcommand), "")
    }

    /// Write a file into the working copy.
    pub fn file(&self, rel: &str, contents: &str) -> &Self {
        let path = self.workdir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write working copy file");
        self
    }

    /// Every recorded invocation, arguments space-joined.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// The binary pointed at this fake, with a non-interactive editor.
    pub fn command(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = cmd_bin(BIN);
        cmd.arg("-C")
            .arg(self.workdir.path())
            .arg("--svn")
            .arg(self.binary())
            .args(args)
            .env("EDITOR", "true")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for FakeSvn {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path).expect("stat fake svn").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod fake svn");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
