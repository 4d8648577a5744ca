use super::{SourceError, Subscription};
use crate::domain::LogLine;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

/// Longest line the framer buffers before emitting it without a newline.
pub const MAX_LINE_LEN: usize = 1024 * 1024;

/// Splits a chunked response body into log lines.
///
/// Blank lines are dropped so that the only empty `LogLine` a subscription
/// ever yields is the end-of-stream marker.
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    // Bytes of `buf` already known to contain no newline.
    scanned: usize,
    max_line_len: usize,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::with_max_line_len(MAX_LINE_LEN)
    }
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            scanned: 0,
            max_line_len: max_line_len.max(1),
        }
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<LogLine> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(offset) = self.buf[self.scanned..].iter().position(|b| *b == b'\n') {
            let pos = self.scanned + offset;
            let raw = self.buf.split_to(pos + 1);
            self.scanned = 0;
            if let Some(line) = Self::decode(&raw[..pos]) {
                lines.push(line);
            }
        }

        // An unterminated line over the limit is emitted in pieces.
        while self.buf.len() >= self.max_line_len {
            let raw = self.buf.split_to(self.max_line_len);
            if let Some(line) = Self::decode(&raw) {
                lines.push(line);
            }
        }
        self.scanned = self.buf.len();
        lines
    }

    /// Flushes a trailing line that was not terminated by `\n`.
    pub fn finish(&mut self) -> Option<LogLine> {
        let raw = self.buf.split();
        self.scanned = 0;
        Self::decode(&raw)
    }

    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    fn decode(raw: &[u8]) -> Option<LogLine> {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        if raw.is_empty() {
            return None;
        }
        Some(LogLine::new(String::from_utf8_lossy(raw).into_owned()))
    }
}

struct FramingState<S> {
    body: Pin<Box<S>>,
    framer: LineFramer,
    pending: VecDeque<LogLine>,
    finished: bool,
    cancel: CancellationToken,
}

/// Turns a byte stream into a `Subscription`.
///
/// The subscription yields the end-of-stream marker once the body is
/// exhausted, and stops without it when `cancel` fires.
pub fn frame_lines<S, E>(body: S, cancel: CancellationToken) -> Subscription
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = FramingState {
        body: Box::pin(body),
        framer: LineFramer::new(),
        pending: VecDeque::new(),
        finished: false,
        cancel,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(line) = st.pending.pop_front() {
                return Some((Ok(line), st));
            }
            if st.finished {
                return None;
            }

            let chunk = tokio::select! {
                biased;
                _ = st.cancel.cancelled() => return None,
                chunk = st.body.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    let lines = st.framer.push(&bytes);
                    st.pending.extend(lines);
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(SourceError::Stream(e.to_string())), st));
                }
                None => {
                    st.finished = true;
                    let tail = st.framer.finish();
                    st.pending.extend(tail);
                    st.pending.push_back(LogLine::end_of_stream());
                }
            }
        }
    })
    .boxed()
}
