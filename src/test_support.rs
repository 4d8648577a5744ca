//! Shared test support utilities
//!
//! Provides a scripted `LogSource` and a recording `LogSink` for use in unit
//! and integration tests.

use crate::domain::{LogLine, SeverityLevel};
use crate::sink::LogSink;
use crate::source::{LogSource, SourceError, Subscription};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// What a single `open` call on a `ScriptedSource` produces.
#[derive(Debug, Clone)]
pub enum ScriptedSubscription {
    /// Yields the lines, then ends. Include `""` to send the end-of-stream marker.
    Lines(Vec<String>),
    /// Yields the lines, then stays open until the token is cancelled.
    Hold(Vec<String>),
    /// Yields the lines, cancels the token, then sends the end-of-stream marker.
    EndAfterCancel(Vec<String>),
    /// `open` fails with `SourceError::Rejected`.
    Reject { status: u16, body: String },
}

impl ScriptedSubscription {
    pub fn lines(lines: &[&str]) -> Self {
        Self::Lines(to_owned(lines))
    }

    pub fn hold(lines: &[&str]) -> Self {
        Self::Hold(to_owned(lines))
    }

    pub fn end_after_cancel(lines: &[&str]) -> Self {
        Self::EndAfterCancel(to_owned(lines))
    }

    pub fn reject(status: u16, body: &str) -> Self {
        Self::Reject {
            status,
            body: body.to_string(),
        }
    }
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| (*l).to_string()).collect()
}

/// Log source that replays a fixed script, one entry per `open`.
///
/// Once the script is exhausted every further `open` holds the stream open
/// with no lines.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<ScriptedSubscription>>,
    opened: Mutex<Vec<SeverityLevel>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<ScriptedSubscription>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Severity passed to each `open` call, in call order.
    pub fn opened_severities(&self) -> Vec<SeverityLevel> {
        self.opened.lock().clone()
    }

    pub fn open_count(&self) -> usize {
        self.opened.lock().len()
    }
}

fn lines_stream(lines: Vec<String>) -> impl futures::Stream<Item = Result<LogLine, SourceError>> {
    stream::iter(lines.into_iter().map(|l| Ok(LogLine::from(l))))
}

#[async_trait]
impl LogSource for ScriptedSource {
    async fn open(
        &self,
        severity: SeverityLevel,
        cancel: CancellationToken,
    ) -> Result<Subscription, SourceError> {
        self.opened.lock().push(severity);
        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or(ScriptedSubscription::Hold(Vec::new()));

        match next {
            ScriptedSubscription::Lines(lines) => Ok(lines_stream(lines).boxed()),
            ScriptedSubscription::Hold(lines) => {
                Ok(lines_stream(lines).chain(stream::pending()).boxed())
            }
            ScriptedSubscription::EndAfterCancel(lines) => Ok(lines_stream(lines)
                .chain(stream::once(async move {
                    cancel.cancel();
                    Ok(LogLine::end_of_stream())
                }))
                .boxed()),
            ScriptedSubscription::Reject { status, body } => {
                Err(SourceError::Rejected { status, body })
            }
        }
    }
}

/// Sink that records every emitted line.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
    emitted: Notify,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Resolves once at least `count` lines have been emitted.
    pub async fn wait_for_lines(&self, count: usize) {
        loop {
            let notified = self.emitted.notified();
            if self.lines.lock().len() >= count {
                return;
            }
            notified.await;
        }
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, line: &str) {
        self.lines.lock().push(line.to_string());
        self.emitted.notify_waiters();
    }
}
