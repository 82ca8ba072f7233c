//! Raw event to [`RequestEvent`] normalization.
//!
//! # Responsibilities
//! - Build the canonical payload for each source kind
//! - Derive the routing key (pluggable per source kind)
//! - Attach the handler resolved by the [`PatternMatcher`]
//!
//! # Routing Keys
//! ```text
//! Storage      → leading segment of the single container name
//! MessageBatch → the single topic
//! EventBus     → detail-type
//! Gateway      → ("API", method, path), always structured
//! Unrecognised → no-route symbol
//! ```
//!
//! # Design Decisions
//! - A batch spanning several containers or topics is a misconfiguration and
//!   routes to no-route
//! - Gateway path params come from the matched template, not the literal path

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::config::NormalizerConfig;
use crate::events::body;
use crate::events::kinds::{
    BusNotification, EventPayload, GatewayRequest, MessageRecord, RequestEvent, StorageObject,
};
use crate::events::session::WebSession;
use crate::events::source::{BusEnvelope, GatewayProxyRequest, MessageBatch, RawEvent, StorageNotification};
use crate::routing::pattern::extract_path_params;
use crate::routing::{PatternMatcher, RouteEntry, RouteTuple, RoutingKey};

/// Inputs available to a routing-key extractor.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    /// Separator used to split storage container names.
    pub separator: &'a str,
    pub no_route_symbol: &'a str,
}

impl ExtractionContext<'_> {
    pub fn no_route(&self) -> RoutingKey {
        RoutingKey::symbol(self.no_route_symbol)
    }
}

pub type StorageKeyFn = fn(&[StorageObject], &ExtractionContext<'_>) -> RoutingKey;
pub type MessageKeyFn = fn(&[MessageRecord], &ExtractionContext<'_>) -> RoutingKey;
pub type BusKeyFn = fn(Option<&str>, &ExtractionContext<'_>) -> RoutingKey;

/// Routing-key extractors, one per source kind that derives a symbol.
#[derive(Debug, Clone, Copy)]
pub struct KeyExtractors {
    pub storage: StorageKeyFn,
    pub message_batch: MessageKeyFn,
    pub event_bus: BusKeyFn,
}

impl Default for KeyExtractors {
    fn default() -> Self {
        Self {
            storage: domain_from_container,
            message_batch: domain_from_topic,
            event_bus: domain_from_detail_type,
        }
    }
}

impl KeyExtractors {
    pub fn with_storage(mut self, f: StorageKeyFn) -> Self {
        self.storage = f;
        self
    }

    pub fn with_message_batch(mut self, f: MessageKeyFn) -> Self {
        self.message_batch = f;
        self
    }

    pub fn with_event_bus(mut self, f: BusKeyFn) -> Self {
        self.event_bus = f;
        self
    }
}

/// Leading segment of the single container referenced by the batch.
pub fn domain_from_container(objects: &[StorageObject], cx: &ExtractionContext<'_>) -> RoutingKey {
    let containers: BTreeSet<&str> = objects.iter().map(|o| o.container.as_str()).collect();
    match single(containers) {
        Some(container) => {
            let domain = container.split(cx.separator).next().unwrap_or(container);
            RoutingKey::symbol(domain)
        }
        None => cx.no_route(),
    }
}

/// The single topic referenced by the batch.
pub fn domain_from_topic(records: &[MessageRecord], cx: &ExtractionContext<'_>) -> RoutingKey {
    let topics: BTreeSet<&str> = records.iter().map(|r| r.topic.as_str()).collect();
    match single(topics) {
        Some(topic) => RoutingKey::symbol(topic),
        None => cx.no_route(),
    }
}

/// The detail-type verbatim; missing or empty routes to no-route.
pub fn domain_from_detail_type(detail_type: Option<&str>, cx: &ExtractionContext<'_>) -> RoutingKey {
    match detail_type {
        Some(t) if !t.is_empty() => RoutingKey::symbol(t),
        _ => cx.no_route(),
    }
}

fn single(set: BTreeSet<&str>) -> Option<&str> {
    if set.len() == 1 {
        set.into_iter().next()
    } else {
        None
    }
}

/// Converts raw events into [`RequestEvent`]s with their handler attached.
#[derive(Debug, Clone, Copy)]
pub struct EventNormalizer<'a> {
    matcher: PatternMatcher<'a>,
    config: &'a NormalizerConfig,
    extractors: KeyExtractors,
    no_route_symbol: &'a str,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(
        matcher: PatternMatcher<'a>,
        no_route_symbol: &'a str,
        config: &'a NormalizerConfig,
        extractors: KeyExtractors,
    ) -> Self {
        Self {
            matcher,
            config,
            extractors,
            no_route_symbol,
        }
    }

    fn context(&self) -> ExtractionContext<'a> {
        ExtractionContext {
            separator: &self.config.container_separator,
            no_route_symbol: self.no_route_symbol,
        }
    }

    pub fn normalize(&self, raw: RawEvent) -> RequestEvent {
        let event = match raw {
            RawEvent::Storage(n) => self.storage_event(n),
            RawEvent::Gateway(r) => self.gateway_event(r),
            RawEvent::MessageBatch(b) => self.message_event(b),
            RawEvent::EventBus(e) => self.bus_event(e),
            RawEvent::Unrecognised => self.noop_event(),
        };
        tracing::debug!(
            event = %event.log_label(),
            route = %event.matched_pattern(),
            "Event normalized"
        );
        event
    }

    fn resolve(&self, kind: RoutingKey, payload: EventPayload) -> RequestEvent {
        let entry = self.matcher.resolve(&kind);
        RequestEvent::new(kind, entry, payload)
    }

    fn noop_event(&self) -> RequestEvent {
        self.resolve(self.context().no_route(), EventPayload::Noop)
    }

    fn storage_event(&self, notification: StorageNotification) -> RequestEvent {
        let objects: Vec<StorageObject> = notification
            .records
            .into_iter()
            .map(|r| StorageObject {
                container: r.entity.bucket.name,
                key: r.entity.object.key,
            })
            .collect();
        let kind = (self.extractors.storage)(&objects, &self.context());
        self.resolve(kind, EventPayload::StorageChange(objects))
    }

    fn message_event(&self, batch: MessageBatch) -> RequestEvent {
        let records: Vec<MessageRecord> = batch
            .records
            .into_iter()
            .flat_map(|(_, records)| records)
            .map(|r| MessageRecord {
                topic: r.topic,
                key: r.key.as_deref().map(decode_record_key),
                value: r.value.as_deref().map(decode_record_value).unwrap_or(Value::Null),
            })
            .collect();
        let kind = (self.extractors.message_batch)(&records, &self.context());
        self.resolve(kind, EventPayload::MessageRecords(records))
    }

    fn bus_event(&self, envelope: BusEnvelope) -> RequestEvent {
        let kind = (self.extractors.event_bus)(envelope.detail_type.as_deref(), &self.context());
        let notification = BusNotification {
            topic: envelope.detail_type.unwrap_or_default(),
            body: envelope.detail,
        };
        self.resolve(kind, EventPayload::EventBus(notification))
    }

    fn gateway_event(&self, request: GatewayProxyRequest) -> RequestEvent {
        let tuple = RouteTuple::api(request.method.clone(), request.path.clone());
        let entry = self.matcher.resolve(&RoutingKey::Structured(tuple.clone()));

        let headers = standardise_headers(request.headers);
        let path_params = match entry.pattern.as_tuple() {
            Some(template) => extract_path_params(&template.path, &tuple.path),
            None => Default::default(),
        };
        let body = decode_gateway_body(entry, request.body.as_deref(), request.is_base64_encoded);
        let session = WebSession::from_headers(&headers);

        let payload = EventPayload::Gateway(GatewayRequest {
            method: request.method,
            path: request.path,
            headers,
            path_params,
            body,
            query_params: request.query_params,
            session,
        });
        RequestEvent::new(RoutingKey::Structured(tuple), entry, payload)
    }
}

/// Lower-case header names; later duplicates overwrite earlier ones.
fn standardise_headers(raw: serde_json::Map<String, Value>) -> BTreeMap<String, String> {
    raw.into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (name.to_ascii_lowercase(), value)
        })
        .collect()
}

fn decode_gateway_body(entry: &RouteEntry, raw: Option<&str>, is_base64: bool) -> Value {
    let Some(raw) = raw else {
        return Value::Null;
    };
    if let Some(decode) = entry.options.decode_body {
        return decode(raw);
    }
    if is_base64 {
        return match body::decode_base64_text(raw) {
            Some(text) => Value::String(text),
            None => {
                tracing::warn!(route = %entry.pattern, "Body flagged as base64 but failed to decode");
                body::passthrough(raw)
            }
        };
    }
    body::passthrough(raw)
}

fn decode_record_key(raw: &str) -> String {
    match body::decode_base64(raw) {
        Some(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        None => raw.to_string(),
    }
}

fn decode_record_value(raw: &str) -> Value {
    match body::decode_base64(raw) {
        Some(bytes) => serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        None => body::json_body(raw),
    }
}
