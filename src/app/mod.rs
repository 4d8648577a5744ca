pub mod config;
pub mod logging_system;
pub mod shutdown;

pub use config::{Config, ConfigError, DiagnosticsLevel, LogFormat};
pub use logging_system::{InitializationError, LoggingSystem, setup_logging_safe};
pub use shutdown::ShutdownSignal;

use crate::domain::{EXIT_SUCCESS, MonitorError};
use crate::sink::StdoutSink;
use crate::source::HttpLogSource;
use crate::supervisor::{RunSummary, Supervisor};
use std::sync::Arc;
use tracing::{debug, info};

pub struct App {
    config: Config,
    source: HttpLogSource,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, MonitorError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Self::from_config(config)
    }

    /// Builds the HTTP client. Nothing is sent to the server yet.
    pub fn from_config(config: Config) -> Result<Self, MonitorError> {
        let source = HttpLogSource::new(config.source_config()).map_err(MonitorError::Setup)?;
        debug!(url = %source.monitor_url(), "Log monitor client ready");
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(self) -> Result<RunSummary, MonitorError> {
        let signal = ShutdownSignal::register().map_err(MonitorError::Signal)?;

        info!(
            "Starting rask-log-monitor v{} (address={}, log_level={})",
            env!("CARGO_PKG_VERSION"),
            self.config.address,
            self.config.severity
        );

        let supervisor = Supervisor::new(self.source, Arc::new(StdoutSink));
        supervisor.run(self.config.severity, signal.recv()).await
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Runs the monitor for the given argv and returns the process exit code.
pub async fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let config = match Config::from_args_and_env(args) {
        Ok(config) => config,
        Err(ConfigError::Cli(e)) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return EXIT_SUCCESS;
        }
        Err(e) => return report(&MonitorError::from(e)),
    };

    if let Err(e) = setup_logging_safe(config.diagnostics_level, config.log_format) {
        eprintln!("Warning: {e}");
    }

    let app = match App::from_config(config) {
        Ok(app) => app,
        Err(e) => return report(&e),
    };

    match app.run().await {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &MonitorError) -> i32 {
    eprintln!("{err}");
    err.exit_code()
}

// Main entry point for the application
pub async fn main() -> i32 {
    run_with_args(std::env::args_os()).await
}
