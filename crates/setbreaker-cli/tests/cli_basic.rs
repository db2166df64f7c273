//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway preferences
//! directory and verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "setbreaker-cli", "--"])
        .args(args)
        .env("SETBREAKER_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Run an interactive `run` session fed from `input`; returns (exit code, stdout).
fn run_session(config_dir: &Path, args: &[&str], input: &str) -> (i32, String) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "setbreaker-cli", "--", "run"])
        .args(args)
        .env("SETBREAKER_CONFIG_DIR", config_dir)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI session");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write session input");
    let output = child.wait_with_output().expect("Failed to wait for CLI session");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    (output.status.code().unwrap_or(-1), stdout)
}

/// Timer bar lines printed by a `run` session.
fn status_lines(stdout: &str) -> Vec<&str> {
    stdout.lines().filter(|l| l.starts_with('[')).collect()
}

/// Parse JSON lines output from `simulate`.
fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("Failed to parse JSON line"))
        .collect()
}

#[test]
fn test_simulate_full_rest_blocks_feed() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["simulate", "--defaults", "--rest-period", "15"]);
    assert_eq!(code, 0, "simulate failed");

    let lines = json_lines(&stdout);
    let completed = lines
        .iter()
        .filter(|v| v["type"] == "RestCompleted")
        .count();
    assert_eq!(completed, 1);

    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["phase"], "expired");
    assert_eq!(snapshot["display"], "00:00");
    assert_eq!(snapshot["blocked"], true);
}

#[test]
fn test_simulate_next_set_unblocks() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &["simulate", "--defaults", "--rest-period", "15", "--choice", "next"],
    );
    assert_eq!(code, 0, "simulate failed");

    let snapshot = json_lines(&stdout).pop().unwrap();
    assert_eq!(snapshot["blocked"], false);
    assert_eq!(snapshot["phase"], "running");
    assert_eq!(snapshot["remaining_secs"], 15);
}

#[test]
fn test_simulate_scroll_arms_timer() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(
        dir.path(),
        &[
            "simulate",
            "--defaults",
            "--no-auto-start",
            "--start-on-scroll",
            "--scroll",
            "5,5,5,10",
            "--ticks",
            "5",
        ],
    );
    assert_eq!(code, 0, "simulate failed");

    let lines = json_lines(&stdout);
    assert!(lines
        .iter()
        .any(|v| v["type"] == "FeedScrolled" && v["started_timer"] == true));
    let snapshot = lines.last().unwrap();
    assert_eq!(snapshot["phase"], "running");
    assert_eq!(snapshot["display"], "00:55");
}

#[test]
fn test_simulate_rejects_off_grid_rest_period() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["simulate", "--defaults", "--rest-period", "17"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Rest period"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "set", "rest_period", "45"]);
    assert_eq!(code, 0, "config set failed");
    assert_eq!(stdout.trim(), "ok");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "rest_period"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "45");

    let (code, stdout, _) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["rest_period"], 45);
    assert_eq!(json["platform"], "instagram");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "theme"]);
    assert_ne!(code, 0);
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "auto_start_timer", "maybe"]);
    assert_ne!(code, 0);
}

#[test]
fn test_simulate_reads_saved_preferences() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "platform", "tiktok"]);
    assert_eq!(code, 0);

    let (code, stdout, _) = run_cli(dir.path(), &["simulate", "--ticks", "0"]);
    assert_eq!(code, 0);
    let lines = json_lines(&stdout);
    assert_eq!(lines[0]["type"], "FeedLoaded");
    assert_eq!(lines[0]["url"], "https://www.tiktok.com");
}

#[test]
fn test_completions_bash() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("setbreaker"));
}

#[test]
fn test_run_overrides_survive_preference_changes() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout) = run_session(
        dir.path(),
        &["--rest-period", "15", "--no-auto-start"],
        "status\nset start_on_scroll true\nreset\nquit\n",
    );
    assert_eq!(code, 0, "run failed: {stdout}");

    let lines = status_lines(&stdout);
    assert_eq!(lines.first(), Some(&"[   idle] 00:15"));
    assert_eq!(lines.last(), Some(&"[   idle] 00:15"));

    // The flags are session-only; the file keeps its own values.
    let (_, stored, _) = run_cli(dir.path(), &["config", "get", "rest_period"]);
    assert_eq!(stored.trim(), "60");
}

#[test]
fn test_run_explicit_set_replaces_override() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout) = run_session(
        dir.path(),
        &["--rest-period", "15", "--no-auto-start"],
        "set rest_period 30\nreset\nquit\n",
    );
    assert_eq!(code, 0, "run failed: {stdout}");
    assert_eq!(status_lines(&stdout).last(), Some(&"[   idle] 00:30"));
}
