//! Stock handlers.

use serde_json::json;

use crate::error::AppError;
use crate::pipeline::{HandlerOutcome, PipelineOutcome, Request, ResponseBody};

/// Built-in no-route handler: fails the pipeline with a 404-class error.
pub fn default_no_route(request: Request) -> PipelineOutcome {
    request.fail(AppError::no_matching_route())
}

/// Answers every request with an empty JSON object.
pub fn noop_response(request: Request) -> PipelineOutcome {
    request.respond(HandlerOutcome::Success(ResponseBody::json(json!({}))))
}
