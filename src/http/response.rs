//! Rendering of pipeline outcomes into the transport response shape.
//!
//! # Rules (first match wins)
//! ```text
//! 1. bare bootstrap error   → error projection, error code, no headers
//! 2. Success + Success(v)   → v serialised, status_code or default success
//! 3. Success + Failure(e)   → e projection, e's code
//! 4. Failure                → request.error projection, its code or default failure
//! ```
//!
//! # Design Decisions
//! - A handler that succeeds without setting a response renders as a 500
//! - Session cookies are attached regardless of which rule applied

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ResponseConfig;
use crate::error::AppError;
use crate::http::headers::{self, APPLICATION_JSON};
use crate::pipeline::{HandlerOutcome, PipelineOutcome, Request};

pub const MISSING_RESPONSE_MESSAGE: &str = "handler produced no response";

/// The rendered response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub multi_value_headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl DispatchResponse {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResponseRenderer<'a> {
    config: &'a ResponseConfig,
}

impl<'a> ResponseRenderer<'a> {
    pub fn new(config: &'a ResponseConfig) -> Self {
        Self { config }
    }

    /// Render an error raised before any request existed.
    pub fn render_bootstrap_error(&self, error: &AppError) -> DispatchResponse {
        DispatchResponse {
            status_code: error.code,
            headers: BTreeMap::new(),
            multi_value_headers: BTreeMap::new(),
            body: error.serialise(),
        }
    }

    pub fn render(&self, outcome: &PipelineOutcome) -> DispatchResponse {
        let request = outcome.request();
        let (status_code, headers, body) = match outcome {
            PipelineOutcome::Success(request) => self.render_answer(request),
            PipelineOutcome::Failure(request) => self.render_failure(request),
        };
        DispatchResponse {
            status_code,
            headers,
            multi_value_headers: headers::session_headers(&request.event),
            body,
        }
    }

    fn render_answer(&self, request: &Request) -> (u16, BTreeMap<String, String>, String) {
        let base = request.response_headers.as_ref();
        match &request.response {
            Some(HandlerOutcome::Success(body)) => {
                let status = request
                    .status_code
                    .map(|s| s.code())
                    .unwrap_or(self.config.default_success_code);
                (
                    status,
                    headers::with_content_type(base, body.content_type()),
                    body.serialise(),
                )
            }
            Some(HandlerOutcome::Failure(error)) => (
                error.code,
                headers::with_content_type(base, APPLICATION_JSON),
                error.serialise(),
            ),
            None => {
                tracing::error!(
                    handler = %request.event.resolved_handler().name(),
                    "Handler succeeded without a response"
                );
                let error = AppError::new(MISSING_RESPONSE_MESSAGE).with_step("handler");
                (
                    error.code,
                    headers::with_content_type(base, APPLICATION_JSON),
                    error.serialise(),
                )
            }
        }
    }

    fn render_failure(&self, request: &Request) -> (u16, BTreeMap<String, String>, String) {
        let error = request
            .error
            .clone()
            .unwrap_or_else(|| AppError::new("pipeline failure").with_code(self.config.default_failure_code));
        (
            error.code,
            headers::with_content_type(request.response_headers.as_ref(), APPLICATION_JSON),
            error.serialise(),
        )
    }
}
