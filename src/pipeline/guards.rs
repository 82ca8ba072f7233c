//! Stock admission guards.

use crate::config::Environment;
use crate::error::AppError;
use crate::pipeline::outcome::PipelineOutcome;
use crate::pipeline::request::Request;

pub const ENV_EXPECTATIONS_FAILURE: &str = "Env expectations failure";

/// Admits every request.
pub fn allow_all(request: Request, _env: &dyn Environment) -> PipelineOutcome {
    request.succeed()
}

/// Rejects with 500 when the environment lacks an expected variable.
pub fn expected_environment(request: Request, env: &dyn Environment) -> PipelineOutcome {
    if env.has_expected_variables() {
        return request.succeed();
    }
    let missing: Vec<String> = env
        .expected_variables()
        .iter()
        .filter(|key| env.variable(key).is_none())
        .cloned()
        .collect();
    tracing::error!(env = %env.name(), missing = ?missing, "Expected environment variables missing");
    request.fail(
        AppError::admission(ENV_EXPECTATIONS_FAILURE, 500)
            .with_step("environment")
            .with_ctx("missing", missing),
    )
}
