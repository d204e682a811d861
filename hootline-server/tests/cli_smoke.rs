//! Binary smoke tests: flags parse and help renders without touching a
//! database.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_flags() {
    Command::cargo_bin("hootlined")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"))
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--cors-permissive"))
        .stdout(predicate::str::contains("--debug"));
}

#[test]
fn version_matches_the_package() {
    Command::cargo_bin("hootlined")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_fails() {
    Command::cargo_bin("hootlined")
        .unwrap()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
