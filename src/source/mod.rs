pub mod framing;
pub mod http;

use crate::domain::{LogLine, SeverityLevel};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use framing::{LineFramer, frame_lines};
pub use http::{HttpLogSource, HttpSourceConfig};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("Failed to connect to log source: {0}")]
    Connect(#[source] reqwest::Error),
    #[error("Log source rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Log stream error: {0}")]
    Stream(String),
}

/// One open stream of log lines.
///
/// The stream ends with `LogLine::end_of_stream()` when the source closes it.
/// It is owned by exactly one relay task and released when that task ends.
pub type Subscription = BoxStream<'static, Result<LogLine, SourceError>>;

/// Factory for subscriptions to a remote log stream.
///
/// `open` may be called any number of times with the same token; every call
/// after a stream-end is a reconnect.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn open(
        &self,
        severity: SeverityLevel,
        cancel: CancellationToken,
    ) -> Result<Subscription, SourceError>;
}

#[async_trait]
impl<T: LogSource + ?Sized> LogSource for Arc<T> {
    async fn open(
        &self,
        severity: SeverityLevel,
        cancel: CancellationToken,
    ) -> Result<Subscription, SourceError> {
        (**self).open(severity, cancel).await
    }
}
