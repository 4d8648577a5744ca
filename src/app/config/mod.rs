mod cli;
mod validation;

use crate::domain::ParseSeverityError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Cli(#[from] clap::Error),
    #[error(transparent)]
    InvalidSeverity(#[from] ParseSeverityError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Verbosity of the monitor's own diagnostics (not of the monitored logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl DiagnosticsLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticsLevel::Error => "error",
            DiagnosticsLevel::Warn => "warn",
            DiagnosticsLevel::Info => "info",
            DiagnosticsLevel::Debug => "debug",
            DiagnosticsLevel::Trace => "trace",
        }
    }
}

impl FromStr for DiagnosticsLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(DiagnosticsLevel::Error),
            "warn" => Ok(DiagnosticsLevel::Warn),
            "info" => Ok(DiagnosticsLevel::Info),
            "debug" => Ok(DiagnosticsLevel::Debug),
            "trace" => Ok(DiagnosticsLevel::Trace),
            _ => Err(format!("Invalid diagnostics level: {s}")),
        }
    }
}

/// Output format for diagnostics on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, compact lines (default)
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

pub use cli::Config;
