//! End-to-end tests for the `tn` binary.
//!
//! Only commands that never reach the network run here; API behavior is
//! covered by the wiremock suites in the API crate.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn tn_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tn"))
}

/// Runs `tn` with an isolated config file and no inherited TaskNotes env.
fn run_tn(config_path: &Path, args: &[&str]) -> Output {
    Command::new(tn_binary())
        .args(args)
        .env("TN_CONFIG", config_path)
        .env_remove("TASKNOTES_API_URL")
        .env_remove("TASKNOTES_TOKEN")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn config_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

#[test]
fn test_filter_check_prints_query_json() {
    let (_dir, config) = config_dir();
    let output = run_tn(
        &config,
        &["filter-check", "--json", "status:open AND priority:high OR tags:urgent"],
    );
    assert!(output.status.success());

    let tree: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(tree["type"], "group");
    assert_eq!(tree["conjunction"], "or");
    assert_eq!(tree["children"][0]["conjunction"], "and");
    assert_eq!(tree["children"][1]["property"], "tags");
}

#[test]
fn test_filter_check_invalid_expression_exits_1() {
    let (_dir, config) = config_dir();
    let output = run_tn(&config, &["filter-check", "priorty:high"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: filter error: unknown property"));
    assert!(stderr.contains("did you mean 'priority'?"));
}

#[test]
fn test_filter_check_json_error_object() {
    let (_dir, config) = config_dir();
    let output = run_tn(&config, &["--json", "filter-check", "(status:open"]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "FILTER_ERROR");
}

#[test]
fn test_filter_help_lists_properties() {
    let (_dir, config) = config_dir();
    let output = run_tn(&config, &["filter-help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("PROPERTIES"));
    assert!(text.contains("is-before"));
}

#[test]
fn test_config_set_and_show() {
    let (_dir, config) = config_dir();

    let output = run_tn(&config, &["config", "set", "api_url", "http://127.0.0.1:8181"]);
    assert!(output.status.success());
    let output = run_tn(&config, &["config", "set", "token", "super-secret-token"]);
    assert!(output.status.success());

    let output = run_tn(&config, &["config", "show", "--json"]);
    assert!(output.status.success());
    let shown: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["exists"], true);
    assert_eq!(shown["config"]["api_url"], "http://127.0.0.1:8181");
    assert_eq!(shown["config"]["token"], "supe...oken");
}

#[test]
fn test_config_unknown_key_exits_5() {
    let (_dir, config) = config_dir();
    let output = run_tn(&config, &["config", "set", "colour", "on"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_unreachable_server_exits_3() {
    let (_dir, config) = config_dir();
    let output = run_tn(&config, &["--api-url", "http://127.0.0.1:1", "health"]);
    assert_eq!(output.status.code(), Some(3));
}
