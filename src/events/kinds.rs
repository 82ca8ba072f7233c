//! Canonical request events.
//!
//! Every event carries its routing key and the handler resolved for it. Both
//! are fixed at normalization time; only the variant payload is mutable.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::events::session::WebSession;
use crate::routing::{Handler, PathParams, RouteEntry, RoutePattern, RoutingKey};

/// One object touched by a storage-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    pub container: String,
    pub key: String,
}

impl StorageObject {
    /// `container/key`.
    pub fn object_path(&self) -> String {
        format!("{}/{}", self.container, self.key)
    }
}

/// One broker record; `value` holds best-effort parsed JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub topic: String,
    pub key: Option<String>,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusNotification {
    pub topic: String,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: String,
    pub path: String,
    /// Lower-cased header names.
    pub headers: BTreeMap<String, String>,
    pub path_params: PathParams,
    pub body: Value,
    pub query_params: Option<Map<String, Value>>,
    pub session: Option<WebSession>,
}

impl GatewayRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn clear_session(&mut self) {
        self.session = None;
    }
}

/// Variant payload of a [`RequestEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Noop,
    StorageChange(Vec<StorageObject>),
    MessageRecords(Vec<MessageRecord>),
    EventBus(BusNotification),
    Gateway(GatewayRequest),
}

/// A normalized event, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct RequestEvent {
    kind: RoutingKey,
    matched_pattern: RoutePattern,
    resolved_handler: Handler,
    pub payload: EventPayload,
}

impl RequestEvent {
    pub(crate) fn new(kind: RoutingKey, route: &RouteEntry, payload: EventPayload) -> Self {
        Self {
            kind,
            matched_pattern: route.pattern.clone(),
            resolved_handler: route.handler.clone(),
            payload,
        }
    }

    /// The routing key computed at normalization time.
    pub fn kind(&self) -> &RoutingKey {
        &self.kind
    }

    /// Pattern of the route the key resolved to.
    pub fn matched_pattern(&self) -> &RoutePattern {
        &self.matched_pattern
    }

    pub fn resolved_handler(&self) -> &Handler {
        &self.resolved_handler
    }

    pub fn variant_name(&self) -> &'static str {
        match self.payload {
            EventPayload::Noop => "NoopEvent",
            EventPayload::StorageChange(_) => "StorageChangeEvent",
            EventPayload::MessageRecords(_) => "MessageRecordsEvent",
            EventPayload::EventBus(_) => "EventBusEvent",
            EventPayload::Gateway(_) => "GatewayRequestEvent",
        }
    }

    /// Whether this variant can hand session state back to the caller.
    pub fn returnable_session_state(&self) -> bool {
        matches!(self.payload, EventPayload::Gateway(_))
    }

    pub fn session(&self) -> Option<&WebSession> {
        match &self.payload {
            EventPayload::Gateway(req) => req.session.as_ref(),
            _ => None,
        }
    }

    pub fn gateway(&self) -> Option<&GatewayRequest> {
        match &self.payload {
            EventPayload::Gateway(req) => Some(req),
            _ => None,
        }
    }

    pub fn gateway_mut(&mut self) -> Option<&mut GatewayRequest> {
        match &mut self.payload {
            EventPayload::Gateway(req) => Some(req),
            _ => None,
        }
    }

    /// `<VariantName>:<kind>`, as written to the start log.
    pub fn log_label(&self) -> String {
        format!("{}:{}", self.variant_name(), self.kind)
    }
}
