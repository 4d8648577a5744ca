use crate::sink::LogSink;
use crate::source::Subscription;
use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Why a relay task stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The source closed the subscription; the supervisor should reopen it.
    StreamEnded,
    /// The cancellation token fired; nothing more will be forwarded.
    Cancelled,
}

#[derive(Debug, Default)]
pub struct RelayStats {
    lines_forwarded: AtomicU64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines_forwarded(&self) -> u64 {
        self.lines_forwarded.load(Ordering::Relaxed)
    }

    fn record_forwarded(&self) {
        self.lines_forwarded.fetch_add(1, Ordering::Relaxed);
    }
}

/// Forwards the lines of a single subscription to a sink.
pub struct StreamRelay<K> {
    sink: Arc<K>,
    cancel: CancellationToken,
    stats: Arc<RelayStats>,
}

impl<K: LogSink + 'static> StreamRelay<K> {
    pub fn new(sink: Arc<K>, cancel: CancellationToken, stats: Arc<RelayStats>) -> Self {
        Self {
            sink,
            cancel,
            stats,
        }
    }

    pub fn spawn(self, subscription: Subscription) -> JoinHandle<RelayOutcome> {
        tokio::spawn(self.run(subscription))
    }

    pub async fn run(self, mut subscription: Subscription) -> RelayOutcome {
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!("Relay cancelled");
                    return RelayOutcome::Cancelled;
                }
                next = subscription.next() => next,
            };

            match next {
                Some(Ok(line)) if line.is_end_of_stream() => {
                    debug!("Log source closed the stream");
                    return RelayOutcome::StreamEnded;
                }
                Some(Ok(line)) => {
                    // The line may have arrived in the same wakeup as the cancel.
                    if self.cancel.is_cancelled() {
                        return RelayOutcome::Cancelled;
                    }
                    self.sink.emit(line.as_str());
                    self.stats.record_forwarded();
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Log stream failed, treating as end of stream");
                    return RelayOutcome::StreamEnded;
                }
                None => {
                    debug!("Log stream closed without end marker");
                    return RelayOutcome::StreamEnded;
                }
            }
        }
    }
}
