use predicates::prelude::*;
use serial_test::serial;
use test_support::FakeSvn;

const DIFF: &str = "\
Index: lib/thingfish.rb
===================================================================
--- lib/thingfish.rb (revision 1040)
+++ lib/thingfish.rb (working copy)
@@ -1,3 +1,4 @@
+require 'logger'
";

fn changed_repo() -> FakeSvn {
  let svn = FakeSvn::new();
  svn.respond("diff", DIFF).respond("status", "");
  svn
}

#[test]
#[serial]
fn show_commitlog_prints_the_diff() {
  let svn = changed_repo();
  let out = svn.command(&["show-commitlog"]).output().unwrap();
  assert!(out.status.success());
  let stdout = String::from_utf8_lossy(&out.stdout).to_string();
  insta::assert_snapshot!(stdout, @r"
Index: lib/thingfish.rb
===================================================================
--- lib/thingfish.rb (revision 1040)
+++ lib/thingfish.rb (working copy)
@@ -1,3 +1,4 @@
+require 'logger'
");
}

#[test]
#[serial]
fn latin1_diff_is_kept_byte_for_byte() {
  let diff: &[u8] = b"Index: lib/caf\xe9.rb\n+# caf\xe9\n";
  let svn = FakeSvn::new();
  svn.respond_bytes("diff", diff);

  svn.command(&["show-commitlog"]).assert().success().stdout(diff.to_vec());

  svn.command(&["commitlog"]).assert().success();
  assert_eq!(std::fs::read(svn.workdir().join("commit-msg.txt")).unwrap(), diff.to_vec());
}

#[test]
#[serial]
fn empty_diff_is_no_differences() {
  let svn = FakeSvn::new();
  svn
    .command(&["show-commitlog"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("No differences."));
}

#[test]
#[serial]
fn stale_message_file_needs_clean() {
  let svn = changed_repo();
  let msg = svn.workdir().join("commit-msg.txt");

  svn.command(&["commitlog"]).assert().success();
  assert_eq!(std::fs::read_to_string(&msg).unwrap(), DIFF);

  svn
    .command(&["commitlog"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("run `clean`"));

  svn.command(&["clean"]).assert().success();
  assert!(!msg.exists());
  svn.command(&["commitlog"]).assert().success();
  assert!(msg.exists());
}

#[test]
#[serial]
fn checkin_updates_edits_and_commits() {
  let svn = changed_repo();
  svn
    .command(&["checkin", "--verify-cmd", "true"])
    .write_stdin("y\n")
    .assert()
    .success()
    .stderr(predicate::str::contains("---\nIndex: lib/thingfish.rb"))
    .stderr(predicate::str::contains("Continue with checkin?"));

  let calls = svn.calls();
  assert_eq!(calls.len(), 4, "{calls:?}");
  assert_eq!(calls[0], "update --ignore-externals");
  assert_eq!(calls[1], "status -v --ignore-externals .");
  assert_eq!(calls[2], "diff");
  assert!(calls[3].starts_with("commit -F ") && calls[3].ends_with("commit-msg.txt"), "{}", calls[3]);
  assert!(!svn.workdir().join("commit-msg.txt").exists());
}

#[test]
#[serial]
fn checkin_alias_commits_given_targets() {
  let svn = changed_repo();
  svn.command(&["ci", "lib", "README"]).write_stdin("y\n").assert().success();
  let calls = svn.calls();
  assert!(calls.last().is_some_and(|c| c.ends_with("commit-msg.txt lib README")), "{calls:?}");
}

#[test]
#[serial]
fn failed_verification_stops_before_the_diff() {
  let svn = changed_repo();
  svn
    .command(&["checkin", "--verify-cmd", "false"])
    .write_stdin("y\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("verification command failed"));

  assert_eq!(svn.calls(), vec!["update --ignore-externals".to_string()]);
}

#[test]
#[serial]
fn declined_checkin_keeps_the_message() {
  let svn = changed_repo();
  svn
    .command(&["checkin"])
    .write_stdin("n\n")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Aborted."));

  assert!(!svn.calls().iter().any(|c| c.starts_with("commit")));
  assert!(svn.workdir().join("commit-msg.txt").exists());
}

#[test]
#[serial]
fn dry_run_checkin_never_mutates() {
  let svn = changed_repo();
  svn
    .command(&["checkin", "--dry-run"])
    .write_stdin("y\n")
    .assert()
    .success()
    .stderr(predicate::str::contains("(dry run mode)"));

  assert_eq!(svn.calls(), vec!["status -v --ignore-externals .".to_string(), "diff".to_string()]);
  assert!(!svn.workdir().join("commit-msg.txt").exists());
}

#[test]
#[serial]
fn update_and_log_pass_through() {
  let svn = FakeSvn::new();
  svn.respond("log", "r1040 | ged | 2008-04-02 | 1 line\n");

  svn.command(&["update"]).assert().success();
  svn
    .command(&["log", "--start", "1000"])
    .assert()
    .success()
    .stdout(predicate::str::contains("r1040 | ged"));

  assert_eq!(svn.calls(), vec!["update --ignore-externals".to_string(), "log -r1000:HEAD .".to_string()]);
}
