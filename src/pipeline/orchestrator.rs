//! The dispatch pipeline.
//!
//! # Stages
//! ```text
//! Init → Admission-Guard → Start-Log → Params-Transform → Handler-Invoke → Rendered
//! ```
//!
//! # Design Decisions
//! - Stages after the guard are chained with [`PipelineOutcome::and_then`]
//! - A guard rejection is rendered directly and skips every later stage
//! - A raw event that fails to decode never becomes a `Request`; it is
//!   rendered as a bootstrap error

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Map, Value};

use crate::config::{DispatchConfig, Environment};
use crate::error::AppError;
use crate::events::{EventNormalizer, KeyExtractors, RawEvent, SourceKind};
use crate::http::response::{DispatchResponse, ResponseRenderer};
use crate::observability::{metrics, LogLevel, LogSink, LogStatus, TraceSpan, TracingSink};
use crate::pipeline::guards;
use crate::pipeline::outcome::{HttpStatusCode, PipelineOutcome};
use crate::pipeline::request::{InvocationContext, Request};
use crate::routing::{PatternMatcher, RouteTable};

/// Status carried by an event that cannot be decoded.
const MALFORMED_EVENT_CODE: u16 = 400;

/// Status of a guard rejection that carries no error.
const DEFAULT_ADMISSION_CODE: u16 = 403;

pub type GuardFn = dyn Fn(Request, &dyn Environment) -> PipelineOutcome + Send + Sync;
pub type StageFn = dyn Fn(Request) -> PipelineOutcome + Send + Sync;
pub type PolicyPointFn = dyn Fn(Request) -> Request + Send + Sync;

/// Caller-supplied collaborators for one run.
#[derive(Clone)]
pub struct PipelineHooks {
    guard: Arc<GuardFn>,
    params_transform: Arc<StageFn>,
    policy_point: Arc<PolicyPointFn>,
}

impl Default for PipelineHooks {
    fn default() -> Self {
        Self {
            guard: Arc::new(guards::allow_all),
            params_transform: Arc::new(Request::succeed),
            policy_point: Arc::new(unchanged),
        }
    }
}

impl PipelineHooks {
    pub fn with_guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(Request, &dyn Environment) -> PipelineOutcome + Send + Sync + 'static,
    {
        self.guard = Arc::new(guard);
        self
    }

    pub fn with_params_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Request) -> PipelineOutcome + Send + Sync + 'static,
    {
        self.params_transform = Arc::new(transform);
        self
    }

    /// Policy information point, run once on the freshly built request.
    pub fn with_policy_point<F>(mut self, init: F) -> Self
    where
        F: Fn(Request) -> Request + Send + Sync + 'static,
    {
        self.policy_point = Arc::new(init);
        self
    }
}

impl fmt::Debug for PipelineHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHooks").finish_non_exhaustive()
    }
}

/// Routes raw events to handlers and renders the result.
pub struct Dispatcher {
    routes: Arc<RouteTable>,
    config: DispatchConfig,
    extractors: KeyExtractors,
    sink: Arc<dyn LogSink>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>, config: DispatchConfig) -> Self {
        Self {
            routes,
            config,
            extractors: KeyExtractors::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn with_extractors(mut self, extractors: KeyExtractors) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run one event through the pipeline.
    pub fn run(
        &self,
        raw: &Value,
        context: InvocationContext,
        env: &dyn Environment,
        hooks: &PipelineHooks,
        hint: Option<SourceKind>,
    ) -> DispatchResponse {
        let start = Instant::now();
        let renderer = ResponseRenderer::new(&self.config.response);
        let span = TraceSpan::for_invocation(env.name(), context.request_id.as_deref());

        let raw_event = match RawEvent::parse(raw, hint) {
            Ok(event) => event,
            Err(err) => {
                let error = AppError::bootstrap(err.to_string(), MALFORMED_EVENT_CODE)
                    .with_step("normalize");
                return self.bootstrap_failure(&renderer, &error, &span);
            }
        };

        let normalizer = EventNormalizer::new(
            PatternMatcher::new(&self.routes),
            self.routes.no_route_symbol(),
            &self.config.normalizer,
            self.extractors,
        );
        let event = normalizer.normalize(raw_event);
        let request = Request::new(event, context, span).with_observer(Arc::clone(&self.sink));
        let request = (hooks.policy_point)(request);

        let outcome = match (hooks.guard)(request, env) {
            PipelineOutcome::Success(request) => PipelineOutcome::Success(request)
                .and_then(log_start)
                .and_then(|r| (hooks.params_transform)(r))
                .and_then(invoke_handler),
            PipelineOutcome::Failure(rejected) => admission_failure(rejected),
        };

        let response = renderer.render(&outcome);
        let request = outcome.request();
        request.observe(LogLevel::Info, "End Handler", &Map::new(), outcome.log_status());
        if self.config.observability.metrics_enabled {
            metrics::record_dispatch(request.event.variant_name(), response.status_code, start);
        }
        response
    }

    fn bootstrap_failure(
        &self,
        renderer: &ResponseRenderer<'_>,
        error: &AppError,
        span: &TraceSpan,
    ) -> DispatchResponse {
        let mut ctx = Map::new();
        ctx.insert("error".into(), Value::String(error.message.clone()));
        self.sink.log(
            LogLevel::Error,
            "End Handler--with base Error",
            &ctx,
            Some(span),
            LogStatus::Fail,
        );
        if self.config.observability.metrics_enabled {
            metrics::record_bootstrap_error(error.code);
        }
        renderer.render_bootstrap_error(error)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.routes.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn unchanged(request: Request) -> Request {
    request
}

fn log_start(request: Request) -> PipelineOutcome {
    let ctx = match json!({ "event": request.event.log_label() }) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    request.observe(LogLevel::Info, "Start Handler", &ctx, LogStatus::Ok);
    request.succeed()
}

fn invoke_handler(request: Request) -> PipelineOutcome {
    let handler = request.event.resolved_handler().clone();
    tracing::debug!(handler = %handler.name(), "Invoking handler");
    handler.call(request)
}

/// Strip everything a rejected request may have accumulated and carry only
/// the guard's error.
fn admission_failure(mut rejected: Request) -> PipelineOutcome {
    let error = rejected
        .error
        .take()
        .unwrap_or_else(|| AppError::admission("admission denied", DEFAULT_ADMISSION_CODE));
    tracing::info!(code = error.code, reason = %error.message, "Request rejected by admission guard");

    rejected.response = None;
    rejected.response_headers = None;
    rejected.policy_info = None;
    rejected.status_code = Some(HttpStatusCode::from(error.code));
    rejected.error = Some(error);
    PipelineOutcome::Failure(rejected)
}
