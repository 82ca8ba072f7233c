//! The per-invocation request envelope.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::events::RequestEvent;
use crate::observability::{LogLevel, LogSink, LogStatus, TraceSpan};
use crate::pipeline::outcome::{HandlerOutcome, HttpStatusCode, PipelineOutcome};

/// Invocation metadata supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationContext {
    pub request_id: Option<String>,
    /// Opaque host metadata.
    pub metadata: Map<String, Value>,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// State threaded through the pipeline for one event.
///
/// Stages and handlers take the request by value and hand it back inside a
/// [`PipelineOutcome`].
#[derive(Clone)]
pub struct Request {
    pub event: RequestEvent,
    pub context: InvocationContext,
    pub trace_span: TraceSpan,
    pub observer: Option<Arc<dyn LogSink>>,
    pub received_at: DateTime<Utc>,
    pub status_code: Option<HttpStatusCode>,
    pub error: Option<AppError>,
    pub response: Option<HandlerOutcome>,
    pub response_headers: Option<BTreeMap<String, String>>,
    /// Set by the policy information point, if any.
    pub policy_info: Option<Value>,
}

impl Request {
    pub fn new(event: RequestEvent, context: InvocationContext, trace_span: TraceSpan) -> Self {
        Self {
            event,
            context,
            trace_span,
            observer: None,
            received_at: Utc::now(),
            status_code: None,
            error: None,
            response: None,
            response_headers: None,
            policy_info: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LogSink>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Continue the pipeline unchanged.
    pub fn succeed(self) -> PipelineOutcome {
        PipelineOutcome::Success(self)
    }

    /// Stop the pipeline with `error`.
    pub fn fail(mut self, error: AppError) -> PipelineOutcome {
        self.error = Some(error);
        PipelineOutcome::Failure(self)
    }

    /// Record the handler's answer and continue.
    pub fn respond(mut self, outcome: HandlerOutcome) -> PipelineOutcome {
        self.response = Some(outcome);
        PipelineOutcome::Success(self)
    }

    pub fn with_status(mut self, status: HttpStatusCode) -> Self {
        self.status_code = Some(status);
        self
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
    }

    /// Write a record to the attached observer, if any.
    pub fn observe(&self, level: LogLevel, message: &str, ctx: &Map<String, Value>, status: LogStatus) {
        if let Some(observer) = &self.observer {
            observer.log(level, message, ctx, Some(&self.trace_span), status);
        }
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("event", &self.event)
            .field("context", &self.context)
            .field("trace_id", &self.trace_span.trace_id)
            .field("received_at", &self.received_at)
            .field("status_code", &self.status_code)
            .field("error", &self.error)
            .field("response", &self.response)
            .field("response_headers", &self.response_headers)
            .field("policy_info", &self.policy_info)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::request_for;
    use crate::routing::RoutePattern;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, LogStatus)>>);

    impl LogSink for Recorder {
        fn log(&self, _: LogLevel, message: &str, _: &Map<String, Value>, _: Option<&TraceSpan>, status: LogStatus) {
            self.0.lock().unwrap().push((message.to_string(), status));
        }
    }

    #[test]
    fn test_fail_sets_error() {
        let request = request_for(RoutePattern::from("a"))
            .fail(AppError::new("broken").with_code(418))
            .into_failure()
            .unwrap();
        assert_eq!(request.error.unwrap().code, 418);
    }

    #[test]
    fn test_set_header_creates_map() {
        let mut request = request_for(RoutePattern::from("a"));
        assert!(request.response_headers.is_none());
        request.set_header("X-Trace", "1");
        assert_eq!(request.response_headers.unwrap()["X-Trace"], "1");
    }

    #[test]
    fn test_observe_uses_attached_sink() {
        let recorder = Arc::new(Recorder::default());
        let request = request_for(RoutePattern::from("a")).with_observer(recorder.clone());
        request.observe(LogLevel::Info, "hello", &Map::new(), LogStatus::Ok);

        let records = recorder.0.lock().unwrap();
        assert_eq!(records.as_slice(), &[("hello".to_string(), LogStatus::Ok)]);
    }

    #[test]
    fn test_context_metadata() {
        let ctx = InvocationContext::new("req-1").with_metadata("fn", "dispatch");
        assert_eq!(ctx.request_id.as_deref(), Some("req-1"));
        assert_eq!(ctx.metadata["fn"], "dispatch");
    }
}
