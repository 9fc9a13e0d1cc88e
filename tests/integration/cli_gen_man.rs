use predicates::prelude::*;

#[test]
fn gen_man_outputs_troff() {
  let mut cmd = test_support::cmd_bin(test_support::BIN);
  let out = cmd.args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let text = String::from_utf8_lossy(&out.stdout);
  assert!(text.lines().any(|l| l.starts_with(".TH svn-release")), "expected troff man header:\n{text}");
}

#[test]
fn missing_task_is_reported() {
  test_support::cmd_bin(test_support::BIN)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Provide a task"));
}
