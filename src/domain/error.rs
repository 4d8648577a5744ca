use crate::app::config::ConfigError;
use crate::source::SourceError;
use thiserror::Error;

/// Clean shutdown after cancellation.
pub const EXIT_SUCCESS: i32 = 0;
/// Usage error or a subscription the source refused to open.
pub const EXIT_FAILURE: i32 = 1;
/// The client could not be set up before any subscription was attempted.
pub const EXIT_SETUP_FAILURE: i32 = 2;

/// Top-level error type for the monitor.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Error setting up client: {0}")]
    Setup(#[source] SourceError),

    #[error("Error starting monitor: {0}")]
    Open(#[source] SourceError),

    #[error("Failed to register signal handlers: {0}")]
    Signal(#[source] std::io::Error),

    #[error("Stream relay task failed: {0}")]
    RelayFailed(String),
}

impl MonitorError {
    pub fn exit_code(&self) -> i32 {
        match self {
            MonitorError::Config(_) | MonitorError::Open(_) | MonitorError::RelayFailed(_) => {
                EXIT_FAILURE
            }
            MonitorError::Setup(_) | MonitorError::Signal(_) => EXIT_SETUP_FAILURE,
        }
    }
}
