//! Pipeline and handler outcomes.
//!
//! Two distinct sum types, one per nesting level:
//! - [`PipelineOutcome`]: did the request reach a handler-level answer
//! - [`HandlerOutcome`]: what the handler answered, stored on `Request::response`

use std::fmt;

use serde_json::Value;

use crate::error::AppError;
use crate::http::headers::{APPLICATION_JSON, APPLICATION_LD_JSON};
use crate::observability::LogStatus;
use crate::pipeline::request::Request;

/// Outcome of a pipeline stage.
///
/// Both variants carry the request; a failed request has its `error` set.
#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Success(Request),
    Failure(Request),
}

impl PipelineOutcome {
    /// Run `stage` on a success, pass a failure through untouched.
    pub fn and_then<F>(self, stage: F) -> PipelineOutcome
    where
        F: FnOnce(Request) -> PipelineOutcome,
    {
        match self {
            PipelineOutcome::Success(request) => stage(request),
            failure @ PipelineOutcome::Failure(_) => failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success(_))
    }

    pub fn request(&self) -> &Request {
        match self {
            PipelineOutcome::Success(request) | PipelineOutcome::Failure(request) => request,
        }
    }

    pub fn into_request(self) -> Request {
        match self {
            PipelineOutcome::Success(request) | PipelineOutcome::Failure(request) => request,
        }
    }

    pub fn into_success(self) -> Option<Request> {
        match self {
            PipelineOutcome::Success(request) => Some(request),
            PipelineOutcome::Failure(_) => None,
        }
    }

    pub fn into_failure(self) -> Option<Request> {
        match self {
            PipelineOutcome::Success(_) => None,
            PipelineOutcome::Failure(request) => Some(request),
        }
    }

    /// `Ok` only when both levels succeeded.
    pub fn log_status(&self) -> LogStatus {
        match self {
            PipelineOutcome::Success(request)
                if matches!(request.response, Some(HandlerOutcome::Success(_))) =>
            {
                LogStatus::Ok
            }
            _ => LogStatus::Fail,
        }
    }
}

/// The handler's business answer.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Success(ResponseBody),
    Failure(AppError),
}

/// A response value paired with the content type of its serialiser.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBody {
    value: Value,
    content_type: &'static str,
}

impl ResponseBody {
    pub fn json(value: Value) -> Self {
        Self {
            value,
            content_type: APPLICATION_JSON,
        }
    }

    /// Linked-data JSON body.
    pub fn json_ld(value: Value) -> Self {
        Self {
            value,
            content_type: APPLICATION_LD_JSON,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn serialise(&self) -> String {
        self.value.to_string()
    }
}

/// Status codes handlers commonly set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusCode {
    Ok,
    Created,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
    Other(u16),
}

impl HttpStatusCode {
    pub fn code(&self) -> u16 {
        match self {
            HttpStatusCode::Ok => 200,
            HttpStatusCode::Created => 201,
            HttpStatusCode::BadRequest => 400,
            HttpStatusCode::Unauthorized => 401,
            HttpStatusCode::Forbidden => 403,
            HttpStatusCode::NotFound => 404,
            HttpStatusCode::InternalServerError => 500,
            HttpStatusCode::Other(code) => *code,
        }
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        match code {
            200 => HttpStatusCode::Ok,
            201 => HttpStatusCode::Created,
            400 => HttpStatusCode::BadRequest,
            401 => HttpStatusCode::Unauthorized,
            403 => HttpStatusCode::Forbidden,
            404 => HttpStatusCode::NotFound,
            500 => HttpStatusCode::InternalServerError,
            other => HttpStatusCode::Other(other),
        }
    }
}

impl fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
