//! Domain layer for rask-log-monitor.
//!
//! Contains the canonical types shared across all modules:
//! - `LogLine`: one line relayed from the log source, or the end-of-stream marker
//! - `SeverityLevel`: minimum severity requested from the source (Trace/Debug/Info/Warn/Error)
//! - `MonitorError`: Top-level error type and its exit code mapping

pub mod error;
pub mod log_level;
pub mod log_line;

pub use error::{EXIT_FAILURE, EXIT_SETUP_FAILURE, EXIT_SUCCESS, MonitorError};
pub use log_level::{ParseSeverityError, SeverityLevel};
pub use log_line::LogLine;
