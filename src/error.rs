//! Uniform error shape shared by every failure the dispatcher can render.
//!
//! # Error Classes
//! - Bootstrap: raised before a `Request` exists
//! - Admission: the admission guard rejected the invocation
//! - Pipeline: a non-handler stage failed (including "no matching route")
//! - Business: the handler ran and answered with a semantic failure
//!
//! # Design Decisions
//! - One struct for all classes so the renderer unwraps them identically
//! - JSON projection is `{"error", "code", "step", "ctx"}` in that order

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Status code carried by an error when none is supplied.
pub const DEFAULT_ERROR_CODE: u16 = 500;

/// Message used by the built-in no-route handler.
pub const NO_MATCHING_ROUTE_MESSAGE: &str = "no matching route";

/// Where in the invocation lifecycle an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorClass {
    Bootstrap,
    Admission,
    #[default]
    Pipeline,
    Business,
}

/// An error carrying a status code, a message, a step label and free-form context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (code {code})")]
pub struct AppError {
    pub message: String,
    pub code: u16,
    pub step: String,
    pub ctx: Map<String, Value>,
    pub class: ErrorClass,
}

/// Structured projection written into response bodies.
#[derive(Serialize)]
struct ErrorProjection<'a> {
    error: &'a str,
    code: u16,
    step: &'a str,
    ctx: &'a Map<String, Value>,
}

impl AppError {
    /// Create a pipeline-class error with the default code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: DEFAULT_ERROR_CODE,
            step: String::new(),
            ctx: Map::new(),
            class: ErrorClass::default(),
        }
    }

    /// The error raised when no route resolves for an event.
    pub fn no_matching_route() -> Self {
        Self::new(NO_MATCHING_ROUTE_MESSAGE).with_code(404)
    }

    pub fn bootstrap(message: impl Into<String>, code: u16) -> Self {
        Self::new(message).with_code(code).with_class(ErrorClass::Bootstrap)
    }

    pub fn admission(message: impl Into<String>, code: u16) -> Self {
        Self::new(message).with_code(code).with_class(ErrorClass::Admission)
    }

    pub fn business(message: impl Into<String>, code: u16) -> Self {
        Self::new(message).with_code(code).with_class(ErrorClass::Business)
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.step = step.into();
        self
    }

    pub fn with_class(mut self, class: ErrorClass) -> Self {
        self.class = class;
        self
    }

    /// Attach one context entry.
    pub fn with_ctx(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ctx.insert(key.into(), value.into());
        self
    }

    /// JSON value of the structured projection.
    pub fn projection(&self) -> Value {
        serde_json::to_value(self.as_projection()).unwrap_or(Value::Null)
    }

    /// Serialised projection, as placed in a response body.
    pub fn serialise(&self) -> String {
        serde_json::to_string(&self.as_projection()).unwrap_or_default()
    }

    fn as_projection(&self) -> ErrorProjection<'_> {
        ErrorProjection {
            error: &self.message,
            code: self.code,
            step: &self.step,
            ctx: &self.ctx,
        }
    }
}
