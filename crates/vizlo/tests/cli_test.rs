//! Integration tests for the `vizlo` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! config handling, and error exit codes, all without a television.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vizlo` binary with env isolation.
///
/// Clears all `VIZLO_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn vizlo_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vizlo");
    cmd.env("VIZLO_CONFIG", config)
        .env("HOME", "/tmp/vizlo-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vizlo-cli-test-nonexistent")
        .env_remove("VIZLO_PROFILE")
        .env_remove("VIZLO_HOST")
        .env_remove("VIZLO_PORT")
        .env_remove("VIZLO_TOKEN")
        .env_remove("VIZLO_OUTPUT")
        .env_remove("VIZLO_INSECURE")
        .env_remove("VIZLO_TIMEOUT")
        .env_remove("VIZLO_DEFAULT_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

/// A command whose config file does not exist.
fn bare_cmd() -> (tempfile::TempDir, assert_cmd::Command) {
    let dir = tempfile::tempdir().unwrap();
    let cmd = vizlo_cmd(&dir.path().join("config.toml"));
    (dir, cmd)
}

const TWO_PROFILES: &str = r#"
default_profile = "den"

[profiles.den]
host = "192.168.1.40"
auth_token = "Zmq8yt1ol3"

[profiles.bedroom]
host = "tv-bedroom.lan"
"#;

/// A command whose config file holds [`TWO_PROFILES`].
fn configured_cmd() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, TWO_PROFILES).unwrap();
    (dir, path)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, mut cmd) = bare_cmd();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("SmartCast")
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("settings"))
            .and(predicate::str::contains("source"))
            .and(predicate::str::contains("power")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vizlo"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_dir, mut cmd) = bare_cmd();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_status_without_config() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_host_without_token_is_auth_error() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["--host", "192.168.1.40", "status"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("auth token"));
}

#[test]
fn test_unknown_profile() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["--profile", "attic", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("attic").and(predicate::str::contains("bedroom")));
}

#[test]
fn test_unreachable_device_exit_code() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args([
        "--host",
        "127.0.0.1",
        "--port",
        "1",
        "--token",
        "Zmq8yt1ol3",
        "--timeout",
        "2",
        "status",
    ])
    .assert()
    .code(7);
}

#[test]
fn test_invalid_output_format() {
    let (_dir, mut cmd) = bare_cmd();
    let output = cmd.args(["--output", "invalid", "status"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["config", "show"]).assert().success();
}

#[test]
fn test_config_show_masks_token() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("192.168.1.40")
                .and(predicate::str::contains("Zmq8yt1ol3").not()),
        );
}

#[test]
fn test_config_use_switches_default() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["config", "use", "bedroom"])
        .assert()
        .success();
    vizlo_cmd(&path)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bedroom *"));
}

#[test]
fn test_config_use_unknown_profile() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["config", "use", "attic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("attic"));
}

#[test]
fn test_config_set_rejects_zero_interval() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["config", "set", "poll_interval", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_config_set_writes_profile() {
    let (_dir, path) = configured_cmd();
    vizlo_cmd(&path)
        .args(["--profile", "bedroom", "config", "set", "include_balance", "false"])
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("include_balance = false"), "{written}");
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_settings_subcommands_exist() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["settings", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("get"))
            .and(predicate::str::contains("set"))
            .and(predicate::str::contains("dump")),
    );
}

#[test]
fn test_source_subcommands_exist() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["source", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("current"))
            .and(predicate::str::contains("select"))
            .and(predicate::str::contains("reload")),
    );
}

#[test]
fn test_power_subcommands_exist() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["power", "--help"]).assert().success().stdout(
        predicate::str::contains("on")
            .and(predicate::str::contains("off"))
            .and(predicate::str::contains("status")),
    );
}

#[test]
fn test_config_subcommands_exist() {
    let (_dir, mut cmd) = bare_cmd();
    cmd.args(["config", "--help"]).assert().success().stdout(
        predicate::str::contains("init")
            .and(predicate::str::contains("show"))
            .and(predicate::str::contains("profiles"))
            .and(predicate::str::contains("set-token")),
    );
}
