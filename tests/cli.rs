//! End-to-end CLI tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn start_fails_without_config() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("haul")
        .unwrap()
        .current_dir(dir.path())
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("haul.toml"));
}

#[test]
fn dev_flag_rejects_non_boolean_tokens() {
    Command::cargo_bin("haul")
        .unwrap()
        .args(["start", "--dev", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn help_lists_start_options() {
    Command::cargo_bin("haul")
        .unwrap()
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--port")
                .and(predicate::str::contains("--dev"))
                .and(predicate::str::contains("--platform")),
        );
}
