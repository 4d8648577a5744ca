//! Reconnect loop around the stream relay.
//!
//! The supervisor keeps exactly one subscription alive. When the source closes
//! it, a fresh one is opened at the same severity; when the cancellation token
//! fires, the live relay is drained and `run` returns successfully. Failing to
//! open a subscription is fatal and never retried here.

use crate::domain::{MonitorError, SeverityLevel};
use crate::relay::{RelayOutcome, RelayStats, StreamRelay};
use crate::sink::LogSink;
use crate::source::LogSource;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counters reported when a run ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub subscriptions_opened: u64,
    pub stream_ends: u64,
    pub lines_forwarded: u64,
}

impl RunSummary {
    pub fn reconnects(&self) -> u64 {
        self.subscriptions_opened.saturating_sub(1)
    }
}

pub struct Supervisor<S, K> {
    source: S,
    sink: Arc<K>,
    cancel: CancellationToken,
    stats: Arc<RelayStats>,
}

impl<S: LogSource, K: LogSink + 'static> Supervisor<S, K> {
    pub fn new(source: S, sink: Arc<K>) -> Self {
        Self {
            source,
            sink,
            cancel: CancellationToken::new(),
            stats: Arc::new(RelayStats::new()),
        }
    }

    /// Handle to the token this supervisor owns. Cancelling it stops the run.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Streams logs at `severity` until `shutdown` completes.
    pub async fn run<F>(&self, severity: SeverityLevel, shutdown: F) -> Result<RunSummary, MonitorError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let watcher = self.spawn_shutdown_watcher(shutdown);
        let result = self.supervise(severity).await;
        watcher.abort();

        if let Ok(summary) = &result {
            info!(
                subscriptions = summary.subscriptions_opened,
                reconnects = summary.reconnects(),
                lines = summary.lines_forwarded,
                "Log monitor stopped"
            );
        }
        result
    }

    fn spawn_shutdown_watcher<F>(&self, shutdown: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                () = shutdown => {
                    info!("Shutdown requested, stopping log monitor");
                    cancel.cancel();
                }
            }
        })
    }

    async fn supervise(&self, severity: SeverityLevel) -> Result<RunSummary, MonitorError> {
        let mut summary = RunSummary::default();

        loop {
            // A stream-end can race with cancellation; never reopen after it.
            if self.cancel.is_cancelled() {
                break;
            }

            let opened = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                opened = self.source.open(severity, self.cancel.clone()) => opened,
            };
            let subscription = opened.map_err(MonitorError::Open)?;
            summary.subscriptions_opened += 1;

            if summary.subscriptions_opened == 1 {
                info!(%severity, "Streaming server logs");
            } else {
                info!(%severity, attempt = summary.subscriptions_opened, "Reconnected to log stream");
            }

            let mut relay =
                StreamRelay::new(self.sink.clone(), self.cancel.clone(), self.stats.clone())
                    .spawn(subscription);

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    // The relay observes the same token; wait for it to let go
                    // of the subscription.
                    relay.await.map_err(relay_failed)?;
                    break;
                }
                joined = &mut relay => joined.map_err(relay_failed)?,
            };

            match outcome {
                RelayOutcome::StreamEnded => {
                    summary.stream_ends += 1;
                    debug!("Log stream ended, reopening");
                }
                RelayOutcome::Cancelled => break,
            }
        }

        summary.lines_forwarded = self.stats.lines_forwarded();
        Ok(summary)
    }
}

fn relay_failed(e: JoinError) -> MonitorError {
    MonitorError::RelayFailed(e.to_string())
}
