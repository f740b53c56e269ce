use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

/// A config pointing at an interpreter that does not exist, so any script
/// that slips past validation fails loudly with "not accessible".
fn setup() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let missing = dir.path().join("no-such-osascript");
    fs::write(
        &path,
        format!("[bridge]\nosascript = {:?}\n", missing.display().to_string()),
    )
    .expect("write config");
    (dir, path)
}

fn thingsctl(config: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("thingsctl").expect("binary");
    cmd.env("THINGSCTL_CONFIG", config)
        .env_remove("THINGSCTL_APP")
        .env_remove("THINGSCTL_OSASCRIPT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_due_date_is_a_user_error() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["add", "Plan", "--due", "2025-13-01", "--json"])
        .assert()
        .code(2)
        .stdout(contains("\"success\": false"))
        .stdout(contains("\"kind\": \"validation\""))
        .stdout(contains("due date"));
}

#[test]
fn unknown_list_is_a_user_error() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["list", "--list", "inbox-ish", "--json"])
        .assert()
        .code(2)
        .stdout(contains("\"kind\": \"validation\""));
}

#[test]
fn edit_without_changes_is_a_user_error() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["edit", "Plan", "--json"])
        .assert()
        .code(2)
        .stdout(contains("nothing to update"));
}

#[test]
fn project_and_area_together_are_rejected() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["add", "Plan", "--project", "Q1", "--area", "Work", "--json"])
        .assert()
        .code(2)
        .stdout(contains("\"kind\": \"validation\""));
}

#[test]
fn zero_limit_is_rejected() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["list", "--limit", "0"])
        .assert()
        .code(2)
        .stderr(contains("error: Invalid input"));
}

#[test]
fn missing_interpreter_means_things_not_accessible() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["list", "--json"])
        .assert()
        .code(3)
        .stdout(contains("\"kind\": \"not_accessible\""))
        .stdout(contains("\"app\": \"Things3\""));
}

#[test]
fn human_errors_go_to_stderr_with_hint() {
    let (_dir, config) = setup();
    thingsctl(&config)
        .args(["--app", "Things", "complete", "Plan"])
        .assert()
        .code(3)
        .stderr(contains("error: Things is not accessible"))
        .stderr(contains("hint: open -a Things"));
}

#[test]
fn json_can_be_enabled_from_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[output]\njson = true\n").expect("write config");

    thingsctl(&path)
        .args(["list", "--list", "nope"])
        .assert()
        .code(2)
        .stdout(contains("\"success\": false"))
        .stdout(contains("\"command\": \"list\""));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    thingsctl(&dir.path().join("absent.toml"))
        .args(["area", "list", "--json"])
        .assert()
        .code(2)
        .stdout(contains("\"kind\": \"invalid_config\""));
}
