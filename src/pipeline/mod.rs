//! Dispatch pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! raw event + InvocationContext + Environment + PipelineHooks
//!     → orchestrator.rs (normalize, build Request, guard, chained stages)
//!         → guards.rs (stock admission guards)
//!         → request.rs (Request envelope mutated by stages and handler)
//!         → outcome.rs (PipelineOutcome wrapping HandlerOutcome)
//!     → http::response (render to DispatchResponse)
//! ```
//!
//! # Design Decisions
//! - Single-threaded and synchronous per invocation
//! - Pipeline-level and handler-level outcomes are separate types
//! - Nothing is retried; every failure flows straight to rendering

pub mod guards;
pub mod orchestrator;
pub mod outcome;
pub mod request;

pub use orchestrator::{Dispatcher, PipelineHooks};
pub use outcome::{HandlerOutcome, HttpStatusCode, PipelineOutcome, ResponseBody};
pub use request::{InvocationContext, Request};
