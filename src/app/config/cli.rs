use super::{ConfigError, DiagnosticsLevel, LogFormat};
use crate::domain::SeverityLevel;
use crate::source::HttpSourceConfig;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const LONG_ABOUT: &str = "Stream log messages of a server. The monitor lets you listen for log \
levels that may be filtered out of the server logs. For example, the server may be logging at \
the INFO level, but with the monitor you can request --log-level DEBUG.";

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "rask-log-monitor", author, version, about = "Stream log messages from a server", long_about = LONG_ABOUT)]
#[serde(default)]
pub struct Config {
    /// Log level to monitor. Supported values (in order of detail) are
    /// TRACE, DEBUG, INFO, WARN and ERROR
    #[arg(long, env = "MONITOR_LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Address of the server to stream logs from
    #[arg(long, env = "MONITOR_ADDR", default_value = "http://127.0.0.1:8200")]
    pub address: String,

    /// Token sent with every monitor request
    #[arg(long, env = "MONITOR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Connection timeout in seconds
    #[arg(long, env = "MONITOR_CONNECT_TIMEOUT_SECS", default_value = "30")]
    pub connect_timeout_secs: u64,

    /// Configuration file path (optional)
    #[arg(long, env = "MONITOR_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Format of the monitor's own diagnostics on stderr
    #[arg(long, env = "MONITOR_LOG_FORMAT", value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity of the monitor's own diagnostics on stderr
    #[arg(long, env = "MONITOR_DIAGNOSTICS_LEVEL", value_enum, default_value = "warn")]
    pub diagnostics_level: DiagnosticsLevel,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub severity: SeverityLevel,

    #[serde(skip)]
    #[arg(skip)]
    pub connect_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "INFO".to_string(),
            address: "http://127.0.0.1:8200".to_string(),
            token: None,
            connect_timeout_secs: 30,
            config_file: None,
            log_format: LogFormat::Text,
            diagnostics_level: DiagnosticsLevel::Warn,
            severity: SeverityLevel::Info,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Parses CLI args (with env fallbacks) and, when `--config-file` is given,
    /// fills every option left at its default from the file.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Config::command().try_get_matches_from(args)?;
        let mut config = Config::from_arg_matches(&matches)?;

        if let Some(path) = config.config_file.clone() {
            let file_config = Self::read_file(&path)?;
            config = config.merged_with(file_config, &matches);
        }

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path.as_ref())?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Takes each option from the file unless it was given on the command line
    /// or through the environment.
    fn merged_with(mut self, file: Config, matches: &ArgMatches) -> Self {
        let unset = |id: &str| {
            matches!(
                matches.value_source(id),
                None | Some(ValueSource::DefaultValue)
            )
        };

        if unset("log_level") {
            self.log_level = file.log_level;
        }
        if unset("address") {
            self.address = file.address;
        }
        if unset("token") {
            self.token = file.token;
        }
        if unset("connect_timeout_secs") {
            self.connect_timeout_secs = file.connect_timeout_secs;
        }
        if unset("log_format") {
            self.log_format = file.log_format;
        }
        if unset("diagnostics_level") {
            self.diagnostics_level = file.diagnostics_level;
        }
        self
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.severity = self.log_level.parse()?;
        self.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        Ok(())
    }

    pub fn source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            address: self.address.clone(),
            token: self.token.clone(),
            connect_timeout: self.connect_timeout,
            ..Default::default()
        }
    }
}
