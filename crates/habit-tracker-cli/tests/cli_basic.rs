//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs. Nothing here touches the network.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habit-tracker"))
        .env("HABIT_TRACKER_DATA_DIR", dir.path())
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

fn add_habit(dir: &TempDir, name: &str) -> String {
    let habit = run_json(dir, &["--user", "tester", "habit", "add", name]);
    habit["id"].as_str().unwrap().to_string()
}

#[test]
fn test_habit_add_and_list() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(&dir, "Drink water");

    let habits = run_json(&dir, &["--user", "tester", "habit", "list"]);
    let habits = habits.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], id.as_str());
    assert_eq!(habits[0]["name"], "Drink water");
}

#[test]
fn test_habit_add_rejects_blank_name() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["--user", "tester", "habit", "add", "   "]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_check_toggle_updates_day_view() {
    let dir = TempDir::new().unwrap();
    let id = add_habit(&dir, "Read");
    add_habit(&dir, "Stretch");

    let toggled = run_json(&dir, &["--user", "tester", "check", "toggle", &id]);
    assert_eq!(toggled["done"], true);

    let view = run_json(&dir, &["--user", "tester", "check", "show"]);
    assert_eq!(view["completion"]["done"], 1);
    assert_eq!(view["completion"]["total"], 2);
    assert_eq!(view["completion"]["rate"], 50.0);
}

#[test]
fn test_users_are_isolated() {
    let dir = TempDir::new().unwrap();
    add_habit(&dir, "Run");
    let other = run_json(&dir, &["--user", "someone-else", "habit", "list"]);
    assert!(other.as_array().unwrap().is_empty());
}

#[test]
fn test_window_is_clamped_and_drives_series() {
    let dir = TempDir::new().unwrap();
    let window = run_json(&dir, &["--user", "tester", "window", "3"]);
    assert_eq!(window["chartWindowDays"], 7);

    let series = run_json(&dir, &["--user", "tester", "stats", "series", "--date", "2024-03-10"]);
    let series = series.as_array().unwrap();
    assert_eq!(series.len(), 7);
    assert_eq!(series[0]["date"], "2024-03-04");
    assert_eq!(series[6]["date"], "2024-03-10");
}

#[test]
fn test_invalid_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["--user", "tester", "check", "show", "--date", "2024-02-xx"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("2024-02-xx"));
}

#[test]
fn test_reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    add_habit(&dir, "Run");

    let (_, _, code) = run_cli(&dir, &["--user", "tester", "reset"]);
    assert_ne!(code, 0);
    assert_eq!(run_json(&dir, &["--user", "tester", "habit", "list"]).as_array().unwrap().len(), 1);

    let (_, _, code) = run_cli(&dir, &["--user", "tester", "reset", "--yes"]);
    assert_eq!(code, 0);
    assert!(run_json(&dir, &["--user", "tester", "habit", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_export_writes_state_file() {
    let dir = TempDir::new().unwrap();
    add_habit(&dir, "Run");

    let out = dir.path().join("export.json");
    let (_, _, code) = run_cli(&dir, &["--user", "tester", "export", "--output", out.to_str().unwrap()]);
    assert_eq!(code, 0);

    let exported: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(exported["habits"][0]["name"], "Run");
    assert_eq!(exported["chartWindowDays"], 30);
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(&dir, &["config", "set", "feed.limit", "10"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(&dir, &["config", "get", "feed.limit"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "10");

    let (_, _, code) = run_cli(&dir, &["config", "get", "feed.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_auth_status_without_session() {
    let dir = TempDir::new().unwrap();
    let status = run_json(&dir, &["auth", "status"]);
    assert_eq!(status["loggedIn"], false);
}

#[test]
fn test_feed_requires_login() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&dir, &["feed", "list"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}
