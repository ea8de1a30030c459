//! Integration tests for the `favorcard` CLI binary.
//!
//! Argument parsing, config commands and error exits run without a
//! server; the server-bound tests point the binary at a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `favorcard` binary with env isolation.
///
/// Clears all `FAVORCARD_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn favorcard_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("favorcard");
    cmd.env("HOME", "/tmp/favorcard-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/favorcard-cli-test-nonexistent")
        .env_remove("FAVORCARD_PROFILE")
        .env_remove("FAVORCARD_SERVER")
        .env_remove("FAVORCARD_CONFIG")
        .env_remove("FAVORCARD_OUTPUT")
        .env_remove("FAVORCARD_INSECURE")
        .env_remove("FAVORCARD_TIMEOUT")
        .env_remove("FAVORCARD_TOKEN")
        .env_remove("FAVORCARD_PASSWORD");
    cmd
}

/// Same as [`favorcard_cmd`], reading and writing config at `config`.
fn with_config(config: &Path) -> assert_cmd::Command {
    let mut cmd = favorcard_cmd();
    cmd.arg("--config").arg(config);
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = favorcard_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    favorcard_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("favorcard server")
            .and(predicate::str::contains("cards"))
            .and(predicate::str::contains("friends")),
    );
}

#[test]
fn test_cards_help_lists_subcommands() {
    favorcard_cmd().args(["cards", "--help"]).assert().success().stdout(
        predicate::str::contains("create")
            .and(predicate::str::contains("send"))
            .and(predicate::str::contains("use"))
            .and(predicate::str::contains("delete")),
    );
}

#[test]
fn test_completions_bash() {
    favorcard_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    favorcard_cmd()
        .args(["-o", "xml", "stats"])
        .assert()
        .code(2);
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("favorcard.toml");
    with_config(&file)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("favorcard.toml"));
}

#[test]
fn test_config_set_then_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");

    with_config(&file)
        .args(["config", "set", "server", "https://cards.example.com"])
        .assert()
        .success();
    with_config(&file)
        .args(["-p", "work", "config", "set", "server", "https://work.example.com"])
        .assert()
        .success();

    with_config(&file)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default *").and(predicate::str::contains("work")));

    let written = std::fs::read_to_string(&file).unwrap();
    assert!(written.contains("https://work.example.com"));
}

#[test]
fn test_config_set_rejects_bad_server() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    with_config(&file)
        .args(["config", "set", "server", "ftp://cards.example.com"])
        .assert()
        .code(2);
    assert!(!file.exists());
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    with_config(&file)
        .args(["config", "set", "server", "https://cards.example.com"])
        .assert()
        .success();
    with_config(&file)
        .args(["config", "set", "token", "hunter2"])
        .assert()
        .success();

    with_config(&file)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********").and(predicate::str::contains("hunter2").not()));
}

#[test]
fn test_config_use_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    with_config(&file)
        .args(["config", "use", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_config_init_keeps_unparsable_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    let garbage = "profiles = 3\n[[[";
    std::fs::write(&file, garbage).unwrap();

    with_config(&file)
        .args(["config", "init"])
        .write_stdin("\n\n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config loading failed"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), garbage);
}

// ── Error exits ─────────────────────────────────────────────────────

#[test]
fn test_no_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = with_config(&dir.path().join("missing.toml"))
        .args(["cards", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected setup hint:\n{text}");
}

#[test]
fn test_destructive_command_requires_yes() {
    let dir = tempfile::tempdir().unwrap();
    with_config(&dir.path().join("config.toml"))
        .env("FAVORCARD_TOKEN", "tok")
        .args(["--server", "http://127.0.0.1:9", "cards", "delete", "7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_cards_list_groups_duplicates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "username": "alice", "nickname": "Alice"
        })))
        .mount(&server)
        .await;

    let card = |id: u64, expires_at: &str| {
        json!({
            "id": id,
            "title": "Dishes",
            "description": "I do the dishes",
            "status": "active",
            "expires_at": expires_at,
            "updated_at": "2025-12-01T00:00:00Z",
            "creator": { "id": 1, "username": "alice", "nickname": "Alice" },
            "owner": { "id": 1, "username": "alice", "nickname": "Alice" }
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [card(1, "2099-01-01T00:00:00Z"), card(2, "2098-06-01T00:00:00Z")]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = with_config(&dir.path().join("config.toml"))
        .env("FAVORCARD_TOKEN", "tok")
        .args(["--server", &server.uri(), "-o", "json", "cards", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let tiles: Value = serde_json::from_slice(&output.stdout).unwrap();
    let tiles = tiles.as_array().unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0]["id"], "2");
    assert_eq!(tiles[0]["count"], 2);
    assert_eq!(tiles[0]["member_ids"], json!(["2", "1"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "token expired" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    with_config(&dir.path().join("config.toml"))
        .env("FAVORCARD_TOKEN", "stale")
        .args(["--server", &server.uri(), "whoami"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_friends_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/friends"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [
                { "id": 3, "username": "carol", "nickname": "Carol", "email": "carol@example.com" },
                { "id": 4, "username": "dave" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = with_config(&dir.path().join("config.toml"))
        .env("FAVORCARD_TOKEN", "tok")
        .args(["--server", &server.uri(), "-o", "json", "friends", "list"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let friends: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        friends,
        json!([
            { "id": "3", "username": "carol", "display_name": "Carol", "email": "carol@example.com" },
            { "id": "4", "username": "dave", "display_name": "dave", "email": null }
        ])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_stats_json() {
    let server = MockServer::start().await;
    let card = |id: u64, status: &str| {
        json!({
            "id": id,
            "title": "Dishes",
            "status": status,
            "creator": { "id": 1, "username": "alice" },
            "owner": { "id": 2, "username": "bob" }
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [card(1, "active"), card(2, "used"), card(3, "expired")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cards/received"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [card(9, "used")]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let output = with_config(&dir.path().join("config.toml"))
        .env("FAVORCARD_TOKEN", "tok")
        .args(["--server", &server.uri(), "-o", "json", "stats"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats, json!({ "created": 3, "received": 1, "used": 2 }));
}
