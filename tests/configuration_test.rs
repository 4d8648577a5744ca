use rask_log_monitor::app::{Config, ConfigError, DiagnosticsLevel, LogFormat};
use rask_log_monitor::domain::SeverityLevel;
use serial_test::serial;
use std::time::Duration;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("monitor.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
log_level = "debug"
address = "https://vault.internal:8200"
token = "s.file-token"
connect_timeout_secs = 10
log_format = "json"
diagnostics_level = "info"
"#,
    );

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.severity, SeverityLevel::Debug);
    assert_eq!(config.address, "https://vault.internal:8200");
    assert_eq!(config.token.as_deref(), Some("s.file-token"));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.diagnostics_level, DiagnosticsLevel::Info);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "log_level = \"ERROR\"\n");

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.severity, SeverityLevel::Error);
    assert_eq!(config.address, Config::default().address);
    assert_eq!(config.connect_timeout_secs, 30);
}

#[test]
#[serial]
fn test_cli_args_override_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
log_level = "trace"
address = "http://from-file:8200"
"#,
    );

    let config = Config::from_args_and_env([
        "rask-log-monitor",
        "--config-file",
        path.to_str().unwrap(),
        "--log-level",
        "WARN",
    ])
    .unwrap();

    assert_eq!(config.severity, SeverityLevel::Warn);
    assert_eq!(config.address, "http://from-file:8200");
}

#[test]
#[serial]
fn test_explicit_default_values_override_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
log_level = "trace"
address = "http://from-file:8200"
connect_timeout_secs = 5
diagnostics_level = "debug"
"#,
    );

    let config = Config::from_args_and_env([
        "rask-log-monitor",
        "--config-file",
        path.to_str().unwrap(),
        "--log-level",
        "INFO",
        "--address",
        "http://127.0.0.1:8200",
        "--connect-timeout-secs",
        "30",
    ])
    .unwrap();

    assert_eq!(config.severity, SeverityLevel::Info);
    assert_eq!(config.address, "http://127.0.0.1:8200");
    assert_eq!(config.connect_timeout, Duration::from_secs(30));
    // Not given on the command line, so the file wins.
    assert_eq!(config.diagnostics_level, DiagnosticsLevel::Debug);
}

#[test]
#[serial]
fn test_environment_values_override_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "log_level = \"trace\"\n");

    // SAFETY: serialized with the other environment tests in this binary.
    unsafe {
        std::env::set_var("MONITOR_LOG_LEVEL", "INFO");
    }

    let result = Config::from_args_and_env([
        "rask-log-monitor",
        "--config-file",
        path.to_str().unwrap(),
    ]);

    unsafe {
        std::env::remove_var("MONITOR_LOG_LEVEL");
    }

    assert_eq!(result.unwrap().severity, SeverityLevel::Info);
}

#[test]
fn test_invalid_file_severity_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "log_level = \"BOGUS\"\n");

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::InvalidSeverity(_))
    ));
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "log_level = [unterminated\n");

    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_a_file_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.toml");

    assert!(matches!(
        Config::from_file(&missing),
        Err(ConfigError::FileError(_))
    ));
}

#[test]
#[serial]
fn test_environment_fallbacks() {
    // SAFETY: serialized with the other environment tests in this binary.
    unsafe {
        std::env::set_var("MONITOR_LOG_LEVEL", "error");
        std::env::set_var("MONITOR_ADDR", "http://from-env:8200");
    }

    let result = Config::from_args_and_env(["rask-log-monitor"]);

    unsafe {
        std::env::remove_var("MONITOR_LOG_LEVEL");
        std::env::remove_var("MONITOR_ADDR");
    }

    let config = result.unwrap();
    assert_eq!(config.severity, SeverityLevel::Error);
    assert_eq!(config.address, "http://from-env:8200");
}

#[test]
#[serial]
fn test_cli_args_win_over_environment() {
    // SAFETY: serialized with the other environment tests in this binary.
    unsafe {
        std::env::set_var("MONITOR_LOG_LEVEL", "error");
    }

    let result = Config::from_args_and_env(["rask-log-monitor", "--log-level", "trace"]);

    unsafe {
        std::env::remove_var("MONITOR_LOG_LEVEL");
    }

    assert_eq!(result.unwrap().severity, SeverityLevel::Trace);
}
