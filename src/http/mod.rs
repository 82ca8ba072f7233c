//! Response rendering subsystem.
//!
//! # Data Flow
//! ```text
//! PipelineOutcome (or a bare bootstrap AppError)
//!     → response.rs (rendering rules, status selection)
//!     → headers.rs (content type merge, session cookies)
//!     → DispatchResponse {statusCode, headers, multiValueHeaders, body}
//! ```
//!
//! # Design Decisions
//! - Transport-shaped output only; no sockets or connection handling
//! - Every failure class renders through the same error projection

pub mod headers;
pub mod response;

pub use headers::{APPLICATION_JSON, APPLICATION_LD_JSON, CONTENT_TYPE};
pub use response::{DispatchResponse, ResponseRenderer};
