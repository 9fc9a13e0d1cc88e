use predicates::prelude::*;
use serial_test::serial;
use test_support::{FakeSvn, TRUNK_INFO};

const NOW: &str = "2008-04-02T09:05:07";
const ROOT: &str = "svn://svn.example.com/project";

fn repo() -> FakeSvn {
  let svn = FakeSvn::new();
  svn.respond("info", TRUNK_INFO);
  svn
}

#[test]
#[serial]
fn tag_copies_trunk_to_timestamp_tag() {
  let svn = repo();
  svn
    .command(&["tag", "--now-override", NOW])
    .write_stdin("y\n\n")
    .assert()
    .success()
    .stderr(predicate::str::contains(format!("Tagging trunk as {}/tags/20080402-090507", ROOT)));

  assert_eq!(
    svn.calls(),
    vec![
      "info .".to_string(),
      format!("copy -m Tagging for code push {0}/trunk {0}/tags/20080402-090507", ROOT),
    ]
  );
}

#[test]
#[serial]
fn tag_in_dry_run_only_queries() {
  let svn = repo();
  svn
    .command(&["tag", "-n", "--now-override", NOW])
    .write_stdin("y\n\n")
    .assert()
    .success()
    .stderr(predicate::str::contains("(dry run mode)"));

  assert_eq!(svn.calls(), vec!["info .".to_string()]);
}

#[test]
#[serial]
fn declined_tag_aborts_with_status_one() {
  let svn = repo();
  svn
    .command(&["tag", "--now-override", NOW])
    .write_stdin("n\n")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Aborted."));

  assert_eq!(svn.calls(), vec!["info .".to_string()]);
}

#[test]
#[serial]
fn abort_message_survives_silenced_logging() {
  let svn = repo();
  svn
    .command(&["tag", "--now-override", NOW])
    .env("RUST_LOG", "off")
    .write_stdin("n\n")
    .assert()
    .code(1)
    .stderr(predicate::str::contains("Aborted."));
}

#[test]
#[serial]
fn svn_can_ask_for_credentials_during_queries() {
  let svn = repo();
  svn.ask_credentials("info");

  // svn reads its line straight from the terminal; the rest answers our prompts
  svn
    .command(&["tag", "--now-override", NOW])
    .write_stdin("hunter2\ny\n\n")
    .assert()
    .success();

  assert_eq!(
    svn.calls().last().map(String::as_str),
    Some(format!("copy -m Tagging for code push {0}/trunk {0}/tags/20080402-090507", ROOT).as_str())
  );
}

#[test]
#[serial]
fn release_of_existing_version_is_refused() {
  let svn = repo();
  svn.respond_list("branches", "1.0.0/\n1.1.0/\n").respond_list("tags", "");

  svn
    .command(&["release", "1.1.0"])
    .write_stdin("y\n\n")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Did you mean to increment the version?"));

  assert!(!svn.calls().iter().any(|c| c.starts_with("copy")));
}

#[test]
#[serial]
fn release_copies_trunk_to_version_branch() {
  let svn = repo();
  svn.respond_list("branches", "1.0.0/\n1.1.0/\n").respond_list("tags", "20080101-120000/\n");

  svn
    .command(&["release", "1.2.0"])
    .write_stdin("y\n\n")
    .assert()
    .success()
    .stderr(predicate::str::contains("latest release: 1.1.0"));

  let calls = svn.calls();
  assert_eq!(
    calls.last().map(String::as_str),
    Some(format!("copy -m Branching for release {0}/trunk {0}/branches/1.2.0", ROOT).as_str())
  );
}

#[test]
#[serial]
fn release_reads_version_file() {
  let svn = repo();
  svn.respond_list("branches", "1.1.0/\n").file("lib/version.rb", "module X\n  VERSION = '2.0.0'\nend\n");

  svn
    .command(&["release", "--version-file", "lib/version.rb"])
    .write_stdin("y\nShip it\n")
    .assert()
    .success();

  assert!(svn.calls().contains(&format!("copy -m Ship it {0}/trunk {0}/branches/2.0.0", ROOT)));
}

#[test]
#[serial]
fn release_without_version_fails() {
  let svn = repo();
  svn
    .command(&["release"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no release version"));
  assert!(svn.calls().is_empty());
}
