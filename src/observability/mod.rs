//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline stages and renderer produce:
//!     → logging.rs (LogSink: start/end handler records)
//!     → metrics.rs (dispatch counters, latency histograms)
//!     → tracing.rs (TraceSpan carried on every Request)
//!
//! Consumers:
//!     → tracing-subscriber fmt layer (stdout, JSON or pretty)
//!     → whatever recorder the host installs behind the `metrics` facade
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace and span identifiers flow through every log record
//! - Metrics are facade calls only; no exporter is started here

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use logging::{init_logging, LogLevel, LogSink, LogStatus, TracingSink};
pub use self::tracing::TraceSpan;
