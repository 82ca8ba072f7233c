//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Define the log sink the pipeline writes start/end records to
//! - Configure log level at runtime
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development
//! - Log level configurable via config and environment (`RUST_LOG` wins)

use std::fmt;

use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::observability::tracing::TraceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Outcome label attached to a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Ok,
    Fail,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Ok => "ok",
            LogStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for pipeline log records.
pub trait LogSink: Send + Sync {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        ctx: &Map<String, Value>,
        span: Option<&TraceSpan>,
        status: LogStatus,
    );
}

/// Sink that forwards records to `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        ctx: &Map<String, Value>,
        span: Option<&TraceSpan>,
        status: LogStatus,
    ) {
        let ctx = Value::Object(ctx.clone());
        let env = span.map(|s| s.env.as_str()).unwrap_or_default();
        let trace_id = span.map(|s| s.trace_id.as_str()).unwrap_or_default();
        let span_id = span.map(|s| s.span_id.as_str()).unwrap_or_default();
        let handler_id = span.and_then(TraceSpan::handler_id).unwrap_or_default();

        macro_rules! emit {
            ($lvl:ident) => {
                tracing::$lvl!(
                    env = %env,
                    trace_id = %trace_id,
                    span_id = %span_id,
                    handler_id = %handler_id,
                    status = %status,
                    ctx = %ctx,
                    "{}",
                    message
                )
            };
        }

        match level {
            LogLevel::Debug => emit!(debug),
            LogLevel::Info => emit!(info),
            LogLevel::Warn => emit!(warn),
            LogLevel::Error => emit!(error),
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("event_dispatch={}", config.log_level)));

    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if result.is_ok() {
        tracing::info!(level = %config.log_level, json = config.json, "Logging initialized");
    }
}
