//! Gateway body decoders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

/// Per-route body decoder, applied to the body exactly as the transport delivered it.
pub type BodyDecoder = fn(&str) -> Value;

/// Parse the body as JSON, keeping the raw string when it is not JSON.
pub fn json_body(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Keep the body as a plain string.
pub fn passthrough(raw: &str) -> Value {
    Value::String(raw.to_string())
}

/// Decode base64 text into bytes.
pub(crate) fn decode_base64(raw: &str) -> Option<Vec<u8>> {
    STANDARD.decode(raw.trim()).ok()
}

/// Decode a base64 body into UTF-8 text.
pub(crate) fn decode_base64_text(raw: &str) -> Option<String> {
    decode_base64(raw).and_then(|bytes| String::from_utf8(bytes).ok())
}
