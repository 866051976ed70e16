//! CLI smoke tests for the outfit-server binary
//!
//! These tests verify help output, configuration validation and that the
//! server starts against an in-memory database.

use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_outfit_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_outfit-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute outfit-server")
}

async fn run_outfit_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_outfit-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

fn write_config(dir: &TempDir, name: &str, body: &str) -> String {
    let home = dir.path().join("home");
    let content = format!(
        "server:\n  home_dir: \"{}\"\n  host: \"127.0.0.1\"\n  port: 0\n{}",
        home.to_string_lossy().replace('\\', "/"),
        body
    );
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_outfit_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("outfit-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_outfit_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("outfit-server"));
    assert!(stdout.contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_outfit_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {}", stderr);
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_outfit_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_outfit_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "valid.yaml",
        r#"
database:
  url: "sqlite://database/outfit.db"

logging:
  default:
    console_level: info
    file: "logs/outfit.log"
    file_level: info

modules:
  daily_outfit:
    resolution_timeout: "10s"
    weather:
      api_key: "test-key"
"#,
    );

    let output = run_outfit_server(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "Should succeed with valid config\nSTDOUT: {}\nSTDERR: {}",
        stdout,
        stderr
    );
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_cli_check_rejects_unknown_module_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "bad_module.yaml",
        r#"
modules:
  daily_outfit:
    tolerance: 3
"#,
    );

    let output = run_outfit_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Unknown module keys should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("daily_outfit"), "STDERR: {}", stderr);
}

#[test]
fn test_cli_mock_flag_overrides_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "mock.yaml",
        r#"
database:
  url: "postgresql://localhost/nonexistent"
"#,
    );

    let without_mock = run_outfit_server(&["--config", &config_path, "check"]);
    assert!(!without_mock.status.success());

    let with_mock = run_outfit_server(&["--config", &config_path, "--mock", "check"]);
    assert!(
        with_mock.status.success(),
        "STDERR: {}",
        String::from_utf8_lossy(&with_mock.stderr)
    );
}

#[test]
fn test_cli_print_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "print.yaml", "");

    let output = run_outfit_server(&["--config", &config_path, "--port", "9191", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"), "STDOUT: {}", stdout);
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "run.yaml", "");

    let result = run_outfit_server_with_timeout(
        &["--config", &config_path, "--mock", "run"],
        Duration::from_secs(5),
    )
    .await;

    match result {
        // Timeout means the server was up and serving
        Err(err) => assert!(
            err.to_string().contains("elapsed"),
            "Server failed to start: {}",
            err
        ),
        Ok(output) => panic!(
            "Server exited early\nSTDOUT: {}\nSTDERR: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        ),
    }
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_outfit_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_outfit_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}
