//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success, including a repository without modules
//! - Exit code 1: Any error reported by the split
//! - Exit code 2: Invalid command-line usage (handled by clap)

mod common;
use common::prelude::*;
use common::SCENARIO;

/// Exit code 0 is returned for a successful classification.
#[test]
fn test_exit_code_success() {
    let fixture = RepoFixture::scenario();

    fixture.command().arg(fixture.repo()).assert().code(0);
}

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--skip-missing"));
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.arg("--version").assert().code(0);
}

/// Exit code 0 is returned when the repository has no modules.
#[test]
fn test_exit_code_not_modular() {
    let fixture = RepoFixture::new().with_packages(&SCENARIO).build();

    fixture.command().arg(fixture.repo()).assert().code(0);
}

/// Exit code 1 is returned for a repository without metadata.
#[test]
fn test_exit_code_error_missing_repomd() {
    let temp = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("grobisplitter");
    cmd.arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("repomd.xml"));
}

/// Exit code 1 is returned for a repository path that does not exist.
#[test]
fn test_exit_code_error_missing_repository() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.arg("/nonexistent/repository/path")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot access repository"));
}

/// Exit code 1 is returned when the target parent does not exist.
#[test]
fn test_exit_code_error_target_parent_missing() {
    let fixture = RepoFixture::scenario();

    fixture
        .command()
        .arg(fixture.repo())
        .arg("--target")
        .arg(fixture.path().join("missing/split"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Target parent directory does not exist"));
}

/// Exit code 2 is returned when the repository argument is missing.
#[test]
fn test_exit_code_usage_missing_repository() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.assert().code(2);
}

/// Exit code 2 is returned for an unknown action.
#[test]
fn test_exit_code_usage_unknown_action() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.arg("/srv/repo")
        .arg("--action")
        .arg("move")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

/// Exit code 2 is returned for an unknown flag.
#[test]
fn test_exit_code_usage_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("grobisplitter");

    cmd.arg("/srv/repo").arg("--default").assert().code(2);
}
