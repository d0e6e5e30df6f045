//! Integration tests for the RouteCast binary

use std::process::Command;

fn routecast() -> Command {
    Command::new(env!("CARGO_BIN_EXE_routecast"))
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = routecast()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("routecast"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--log-level"));
}

/// Test that the CLI reports its version
#[test]
fn test_cli_version() {
    let output = routecast()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

/// Test that startup fails cleanly without a bot token
#[test]
fn test_missing_bot_token() {
    let output = routecast()
        .args(["--config", "/nonexistent/routecast.toml"])
        .env_remove("ROUTECAST_TELEGRAM__BOT_TOKEN")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("bot token is missing"),
        "Expected a missing token error, got: {stderr}"
    );
}

/// Test that an invalid config value is rejected before anything starts
#[test]
fn test_invalid_log_format() {
    let output = routecast()
        .args(["--config", "/nonexistent/routecast.toml"])
        .env("ROUTECAST_TELEGRAM__BOT_TOKEN", "123:ABC")
        .env("ROUTECAST_LOGGING__FORMAT", "xml")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid log format"), "got: {stderr}");
}
