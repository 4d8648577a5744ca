use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Minimum severity of the log lines a subscription asks the source for.
///
/// This is distinct from `DiagnosticsLevel`, which configures the monitor's own
/// tracing output. A `SeverityLevel` is submitted once when a subscription is
/// opened and reused unchanged on every reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SeverityLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid log level '{input}'. Supported values (in order of detail) are TRACE, DEBUG, INFO, WARN and ERROR")]
pub struct ParseSeverityError {
    pub input: String,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 5] = [
        SeverityLevel::Trace,
        SeverityLevel::Debug,
        SeverityLevel::Info,
        SeverityLevel::Warn,
        SeverityLevel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Trace => "TRACE",
            SeverityLevel::Debug => "DEBUG",
            SeverityLevel::Info => "INFO",
            SeverityLevel::Warn => "WARN",
            SeverityLevel::Error => "ERROR",
        }
    }

    /// Lowercase form sent in the `log_level` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SeverityLevel::Trace => "trace",
            SeverityLevel::Debug => "debug",
            SeverityLevel::Info => "info",
            SeverityLevel::Warn => "warn",
            SeverityLevel::Error => "error",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Ok(SeverityLevel::Trace),
            "DEBUG" => Ok(SeverityLevel::Debug),
            "INFO" => Ok(SeverityLevel::Info),
            "WARN" => Ok(SeverityLevel::Warn),
            "ERROR" => Ok(SeverityLevel::Error),
            _ => Err(ParseSeverityError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("debug".parse::<SeverityLevel>(), Ok(SeverityLevel::Debug));
        assert_eq!("WARN".parse::<SeverityLevel>(), Ok(SeverityLevel::Warn));
        assert_eq!(" Error ".parse::<SeverityLevel>(), Ok(SeverityLevel::Error));
    }

    #[test]
    fn test_parse_rejects_unknown_levels() {
        let err = "BOGUS".parse::<SeverityLevel>().unwrap_err();
        assert_eq!(err.input, "BOGUS");
        assert!(err.to_string().contains("TRACE"));

        assert!("".parse::<SeverityLevel>().is_err());
        assert!("fatal".parse::<SeverityLevel>().is_err());
    }

    #[test]
    fn test_levels_are_ordered_by_importance() {
        assert!(SeverityLevel::Trace < SeverityLevel::Debug);
        assert!(SeverityLevel::Debug < SeverityLevel::Info);
        assert!(SeverityLevel::Info < SeverityLevel::Warn);
        assert!(SeverityLevel::Warn < SeverityLevel::Error);

        let mut sorted = SeverityLevel::ALL;
        sorted.sort();
        assert_eq!(sorted, SeverityLevel::ALL);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in SeverityLevel::ALL {
            assert_eq!(level.to_string().parse::<SeverityLevel>(), Ok(level));
            assert_eq!(level.as_query_value(), level.as_str().to_lowercase());
        }
    }

    #[test]
    fn test_default_is_info() {
        assert_eq!(SeverityLevel::default(), SeverityLevel::Info);
    }
}
