use super::config::{DiagnosticsLevel, LogFormat};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Extra `target=level` directives, comma separated, appended to the filter.
pub const DIRECTIVES_ENV: &str = "MONITOR_LOG";

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Invalid directive format '{input}'. Expected: 'target=level'")]
    InvalidDirectiveFormat { input: String },

    #[error("Invalid log level '{input}' in directive '{directive}'")]
    InvalidLevel { input: String, directive: String },

    #[error("Logging system initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    target: String,
    level: DiagnosticsLevel,
}

impl LogDirective {
    pub fn new(target: &str, level: DiagnosticsLevel) -> Self {
        Self {
            target: target.to_string(),
            level,
        }
    }

    pub fn parse(input: &str) -> Result<Self, InitializationError> {
        let Some((target, level)) = input.split_once('=') else {
            return Err(InitializationError::InvalidDirectiveFormat {
                input: input.to_string(),
            });
        };

        let target = target.trim();
        if target.is_empty() {
            return Err(InitializationError::InvalidDirectiveFormat {
                input: input.to_string(),
            });
        }

        let level = level
            .trim()
            .parse()
            .map_err(|_| InitializationError::InvalidLevel {
                input: level.to_string(),
                directive: input.to_string(),
            })?;

        Ok(Self::new(target, level))
    }

    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_str())
    }
}

pub struct LoggingSystem {
    directives: Arc<RwLock<Vec<LogDirective>>>,
    format: LogFormat,
}

impl LoggingSystem {
    pub fn new(format: LogFormat) -> Self {
        Self {
            directives: Arc::new(RwLock::new(Vec::new())),
            format,
        }
    }

    /// Adds a directive. Malformed directives are reported on stderr and skipped.
    pub fn add_directive(&self, directive_str: &str) {
        match LogDirective::parse(directive_str) {
            Ok(directive) => self.directives.write().push(directive),
            Err(e) => eprintln!("Warning: {e}, skipping directive"),
        }
    }

    pub fn add_default_directives(&self) {
        let default_directives = [
            ("hyper", DiagnosticsLevel::Warn),
            ("hyper_util", DiagnosticsLevel::Warn),
            ("reqwest", DiagnosticsLevel::Warn),
            ("h2", DiagnosticsLevel::Warn),
            ("rustls", DiagnosticsLevel::Warn),
        ];

        let mut directives = self.directives.write();
        for (target, level) in default_directives {
            directives.push(LogDirective::new(target, level));
        }
    }

    pub fn add_env_directives(&self) {
        if let Ok(extra) = std::env::var(DIRECTIVES_ENV) {
            for directive in extra.split(',').filter(|d| !d.trim().is_empty()) {
                self.add_directive(directive);
            }
        }
    }

    /// Installs the global subscriber. Diagnostics always go to stderr so that
    /// stdout only carries relayed log lines.
    pub fn initialize_tracing(&self, default_level: DiagnosticsLevel) -> Result<(), InitializationError> {
        let filter_string = self.build_filter_string(default_level);

        let env_filter =
            EnvFilter::try_new(&filter_string).map_err(|e| InitializationError::LoggingInitFailed {
                details: format!("Failed to create EnvFilter with '{filter_string}'"),
                source: Box::new(e),
            })?;

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match self.format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true)
                        .compact(),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        result.map_err(|e| InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        })
    }

    pub fn build_filter_string(&self, default_level: DiagnosticsLevel) -> String {
        let directives = self.directives.read();

        let mut filter_parts = Vec::with_capacity(directives.len() + 1);
        filter_parts.push(default_level.as_str().to_string());
        filter_parts.extend(directives.iter().map(LogDirective::to_filter_string));

        filter_parts.join(",")
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new(LogFormat::default())
    }
}

/// Installs the global subscriber once per process; later calls report the
/// outcome of the first.
pub fn setup_logging_safe(level: DiagnosticsLevel, format: LogFormat) -> Result<(), InitializationError> {
    static INIT: Once = Once::new();
    static INIT_SUCCESS: AtomicBool = AtomicBool::new(false);

    INIT.call_once(|| {
        let logging_system = LoggingSystem::new(format);
        logging_system.add_default_directives();
        logging_system.add_env_directives();

        if logging_system.initialize_tracing(level).is_ok() {
            INIT_SUCCESS.store(true, Ordering::SeqCst);
        }
    });

    if INIT_SUCCESS.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(InitializationError::LoggingInitFailed {
            details: "Logging system initialization failed".to_string(),
            source: Box::new(std::io::Error::other("Logging initialization error")),
        })
    }
}
