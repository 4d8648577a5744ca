#![warn(rust_2018_idioms)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::missing_errors_doc,      // Internal API
    clippy::module_name_repetitions, // e.g. SourceError in source module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::doc_markdown             // Internal API
)]

pub mod app;
pub mod domain;
pub mod relay;
pub mod sink;
pub mod source;
pub mod supervisor;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export main types for easy access
pub use app::{App, Config};
pub use domain::{LogLine, MonitorError, SeverityLevel};
pub use relay::{RelayOutcome, StreamRelay};
pub use sink::{LogSink, StdoutSink};
pub use source::{HttpLogSource, LogSource, SourceError, Subscription};
pub use supervisor::{RunSummary, Supervisor};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
