//! Raw event shapes and source classification.
//!
//! # Responsibilities
//! - Detect the source kind of a raw event from characteristic fields
//! - Decode the pre-parsed envelope of each kind into typed structs
//!
//! # Detection Order
//! ```text
//! "Records"     → Storage
//! "httpMethod"  → Gateway
//! "eventSource" → MessageBatch
//! "source"      → EventBus
//! otherwise     → Unrecognised (Noop)
//! ```

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::events::EventError;

/// Origin of a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Storage,
    Gateway,
    MessageBatch,
    EventBus,
}

impl SourceKind {
    /// Classify a raw event by the presence of characteristic top-level fields.
    pub fn detect(raw: &Value) -> Option<Self> {
        let obj = raw.as_object()?;
        if obj.contains_key("Records") {
            Some(SourceKind::Storage)
        } else if obj.contains_key("httpMethod") {
            Some(SourceKind::Gateway)
        } else if obj.contains_key("eventSource") {
            Some(SourceKind::MessageBatch)
        } else if obj.contains_key("source") {
            Some(SourceKind::EventBus)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Storage => "storage",
            SourceKind::Gateway => "gateway",
            SourceKind::MessageBatch => "message_batch",
            SourceKind::EventBus => "event_bus",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage-change notification: a batch of object records.
///
/// `Records` is required so a hinted envelope without it is malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageNotification {
    #[serde(rename = "Records")]
    pub records: Vec<StorageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageRecord {
    #[serde(rename = "s3")]
    pub entity: StorageEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    pub bucket: ContainerRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContainerRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}

/// Gateway proxy request.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayProxyRequest {
    #[serde(rename = "httpMethod")]
    pub method: String,
    pub path: String,
    /// Header order is kept so case-colliding names resolve to the last one.
    #[serde(default, deserialize_with = "nullable_map")]
    pub headers: Map<String, Value>,
    #[serde(rename = "queryStringParameters", default)]
    pub query_params: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "isBase64Encoded", default, deserialize_with = "loose_flag")]
    pub is_base64_encoded: bool,
}

/// Message-broker record batch, records grouped by partition.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBatch {
    #[serde(rename = "eventSource")]
    pub event_source: String,
    #[serde(deserialize_with = "ordered_partitions")]
    pub records: Vec<(String, Vec<RawMessageRecord>)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMessageRecord {
    pub topic: String,
    #[serde(default)]
    pub partition: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    /// Base64-encoded key.
    #[serde(default)]
    pub key: Option<String>,
    /// Base64-encoded value.
    #[serde(default)]
    pub value: Option<String>,
}

/// Event-bus notification envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct BusEnvelope {
    pub source: String,
    #[serde(rename = "detail-type", default)]
    pub detail_type: Option<String>,
    #[serde(default)]
    pub detail: Value,
}

/// A raw event decoded into the envelope of its source kind.
#[derive(Debug, Clone)]
pub enum RawEvent {
    Storage(StorageNotification),
    Gateway(GatewayProxyRequest),
    MessageBatch(MessageBatch),
    EventBus(BusEnvelope),
    Unrecognised,
}

impl RawEvent {
    /// Decode `raw`, using `hint` when given and structural detection otherwise.
    pub fn parse(raw: &Value, hint: Option<SourceKind>) -> Result<Self, EventError> {
        let kind = match hint.or_else(|| SourceKind::detect(raw)) {
            Some(kind) => kind,
            None => return Ok(RawEvent::Unrecognised),
        };

        let malformed = |source| EventError::Malformed { kind, source };
        let event = match kind {
            SourceKind::Storage => {
                RawEvent::Storage(StorageNotification::deserialize(raw).map_err(malformed)?)
            }
            SourceKind::Gateway => {
                RawEvent::Gateway(GatewayProxyRequest::deserialize(raw).map_err(malformed)?)
            }
            SourceKind::MessageBatch => {
                RawEvent::MessageBatch(MessageBatch::deserialize(raw).map_err(malformed)?)
            }
            SourceKind::EventBus => {
                RawEvent::EventBus(BusEnvelope::deserialize(raw).map_err(malformed)?)
            }
        };
        Ok(event)
    }

    pub fn source_kind(&self) -> Option<SourceKind> {
        match self {
            RawEvent::Storage(_) => Some(SourceKind::Storage),
            RawEvent::Gateway(_) => Some(SourceKind::Gateway),
            RawEvent::MessageBatch(_) => Some(SourceKind::MessageBatch),
            RawEvent::EventBus(_) => Some(SourceKind::EventBus),
            RawEvent::Unrecognised => None,
        }
    }
}

/// Accepts `true`/`false`, `"true"`/`"True"`/`"false"`, or null.
fn loose_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean flag '{}'", other))),
        },
        Some(other) => Err(de::Error::custom(format!("invalid boolean flag {}", other))),
    }
}

fn nullable_map<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps partitions in document order.
fn ordered_partitions<'de, D>(
    deserializer: D,
) -> Result<Vec<(String, Vec<RawMessageRecord>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PartitionVisitor;

    impl<'de> Visitor<'de> for PartitionVisitor {
        type Value = Vec<(String, Vec<RawMessageRecord>)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of partition name to record list")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut partitions = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, records)) = map.next_entry::<String, Vec<RawMessageRecord>>()? {
                partitions.push((name, records));
            }
            Ok(partitions)
        }
    }

    deserializer.deserialize_any(PartitionVisitor)
}
