use std::io::{self, Write};
use tracing::warn;

/// Destination for relayed log lines.
///
/// `emit` must not block for long: it runs inline in the relay loop.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &str);
}

/// Writes each line to stdout. Diagnostics go to stderr, so stdout carries
/// nothing but the relayed log.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, line: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
            warn!(error = %e, "Failed to write log line to stdout");
        }
    }
}
