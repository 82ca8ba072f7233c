//! Trace span carried by each request.
//!
//! # Responsibilities
//! - Identify one invocation (`trace_id`) and its span lineage (`span_id`)
//! - Carry environment name, tags and key/value annotations into logs
//!
//! # Design Decisions
//! - Identifiers are UUID v4 strings
//! - Child spans keep the parent's `span_id` and environment

use serde_json::{Map, Value};
use uuid::Uuid;

/// Key under which the invocation's request id is recorded.
pub const HANDLER_ID: &str = "handler_id";

#[derive(Debug, Clone, PartialEq)]
pub struct TraceSpan {
    pub env: String,
    pub trace_id: String,
    pub span_id: String,
    pub tags: Vec<String>,
    pub kv: Map<String, Value>,
}

impl TraceSpan {
    pub fn new(env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            trace_id: Uuid::new_v4().to_string(),
            span_id: Uuid::new_v4().to_string(),
            tags: Vec::new(),
            kv: Map::new(),
        }
    }

    /// Span for one invocation, tagged with the host's request id.
    pub fn for_invocation(env: impl Into<String>, request_id: Option<&str>) -> Self {
        let span = Self::new(env);
        match request_id {
            Some(id) => span.with_kv(HANDLER_ID, id),
            None => span,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_kv(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kv.insert(key.into(), value.into());
        self
    }

    /// New span sharing this span's lineage, with a fresh trace id.
    pub fn child(&self, tags: Vec<String>, kv: Map<String, Value>) -> Self {
        Self {
            env: self.env.clone(),
            trace_id: Uuid::new_v4().to_string(),
            span_id: self.span_id.clone(),
            tags,
            kv,
        }
    }

    pub fn handler_id(&self) -> Option<&str> {
        self.kv.get(HANDLER_ID).and_then(Value::as_str)
    }

    /// Flat map of span fields merged with the key/value annotations.
    pub fn serialise(&self) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert("env".into(), self.env.clone().into());
        out.insert("trace_id".into(), self.trace_id.clone().into());
        out.insert("span_id".into(), self.span_id.clone().into());
        out.insert("tags".into(), self.tags.clone().into());
        out.extend(self.kv.clone());
        out
    }
}
