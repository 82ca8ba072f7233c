//! In-process event router and dispatch pipeline.
//!
//! # Architecture Overview
//!
//! ```text
//!     raw event (storage / gateway / message batch / event bus)
//!         │
//!         ▼
//!     ┌──────────┐    ┌──────────────┐    ┌───────────────┐
//!     │  events  │───▶│   routing    │───▶│   pipeline    │
//!     │normalizer│    │table+matcher │    │ guard, stages │
//!     └──────────┘    └──────────────┘    └───────┬───────┘
//!                                                 │
//!                                                 ▼
//!                                         ┌───────────────┐
//!                                         │     http      │
//!                                         │   renderer    │───▶ {statusCode, headers,
//!                                         └───────────────┘      multiValueHeaders, body}
//!
//!     Cross-cutting: config, error, observability (logging, trace span, metrics)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use event_dispatch::config::{DispatchConfig, ProcessEnvironment};
//! use event_dispatch::pipeline::{Dispatcher, HandlerOutcome, InvocationContext, PipelineHooks, ResponseBody};
//! use event_dispatch::routing::RouteTable;
//!
//! let mut routes = RouteTable::new();
//! routes.route(("API", "GET", "/hello/{name}"), "hello", |req| {
//!     let name = req.event.gateway().map(|g| g.path_params["name"].clone()).unwrap_or_default();
//!     req.respond(HandlerOutcome::Success(ResponseBody::json(serde_json::json!({ "hello": name }))))
//! });
//!
//! let dispatcher = Dispatcher::new(Arc::new(routes), DispatchConfig::default());
//! let raw = serde_json::json!({"httpMethod": "GET", "path": "/hello/world"});
//! let env = ProcessEnvironment::new("dev", vec![]);
//! let response = dispatcher.run(&raw, InvocationContext::new("req-1"), &env, &PipelineHooks::default(), None);
//! assert_eq!(response.status_code, 200);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod observability;
pub mod pipeline;
pub mod routing;

pub use config::DispatchConfig;
pub use error::AppError;
pub use http::DispatchResponse;
pub use pipeline::{Dispatcher, PipelineHooks};
pub use routing::RouteTable;
