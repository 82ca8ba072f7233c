//! Event normalization subsystem.
//!
//! # Data Flow
//! ```text
//! raw event (serde_json::Value) + optional SourceKind hint
//!     → source.rs (classify, decode envelope)
//!     → normalizer.rs (payload, routing key, handler resolution)
//!         → body.rs (gateway body decoding)
//!         → session.rs (cookie session)
//!     → kinds.rs RequestEvent (kind + resolved handler + payload)
//! ```
//!
//! # Design Decisions
//! - Envelopes arrive pre-parsed; only structure and routing are handled here
//! - Unrecognised shapes become Noop events routed to no-route
//! - A recognised but malformed envelope is an error, not a Noop

pub mod body;
pub mod kinds;
pub mod normalizer;
pub mod session;
pub mod source;

use thiserror::Error;

pub use kinds::{
    BusNotification, EventPayload, GatewayRequest, MessageRecord, RequestEvent, StorageObject,
};
pub use normalizer::{EventNormalizer, ExtractionContext, KeyExtractors};
pub use session::WebSession;
pub use source::{RawEvent, SourceKind};

/// Errors raised while decoding a raw event.
#[derive(Debug, Error)]
pub enum EventError {
    /// The envelope did not have the shape of its source kind.
    #[error("malformed {kind} event: {source}")]
    Malformed {
        kind: SourceKind,
        #[source]
        source: serde_json::Error,
    },
}
