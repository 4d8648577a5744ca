use std::fmt;

/// A single line produced by a log subscription.
///
/// The empty line is reserved as the end-of-stream marker: it tells the relay
/// that the source closed the subscription and is never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogLine(String);

impl LogLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn end_of_stream() -> Self {
        Self(String::new())
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for LogLine {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for LogLine {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for LogLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
