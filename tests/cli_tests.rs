//! End-to-end tests for the `workrest` binary.
//!
//! Only non-interactive paths are exercised here: help, completions, the
//! sound list and the configuration errors reported before the timer
//! screen opens.

use assert_cmd::Command;
use predicates::prelude::*;

fn workrest() -> Command {
    Command::cargo_bin("workrest").unwrap()
}

// ============================================================================
// Informational Commands
// ============================================================================

#[test]
fn test_help() {
    workrest()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rest"))
        .stdout(predicate::str::contains("sounds"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_version() {
    workrest()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    workrest()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("workrest"));
}

#[test]
fn test_sounds_lists_builtin_alarm() {
    workrest()
        .arg("sounds")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available alarm sounds"))
        .stdout(predicate::str::contains("beeps"));
}

// ============================================================================
// Configuration Errors
// ============================================================================

#[test]
fn test_missing_alarm_file() {
    workrest()
        .args(["run", "--alarm", "/definitely/not/here/alarm.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alarm sound file not found"));
}

#[test]
fn test_unknown_sound_name() {
    workrest()
        .args(["run", "--alarm", "NoSuchSoundAnywhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("workrest sounds"));
}

#[test]
fn test_unsupported_alarm_format() {
    let file = tempfile::Builder::new()
        .suffix(".txt")
        .tempfile()
        .unwrap();

    workrest()
        .arg("run")
        .arg("--alarm")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported sound format"))
        .stderr(predicate::str::contains("hint"));
}

#[test]
fn test_log_directory_missing() {
    workrest()
        .args(["run", "--mute", "--log-file", "/definitely/not/here/workrest.log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("log file directory does not exist"));
}

#[test]
fn test_empty_alarm_is_rejected_by_parser() {
    workrest()
        .args(["run", "--alarm", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("alarm must not be empty"));
}
