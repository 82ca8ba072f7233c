//! Response header assembly.

use std::collections::BTreeMap;

use crate::events::RequestEvent;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_LD_JSON: &str = "application/ld+json";

/// Request-set headers plus the serialiser's content type.
pub fn with_content_type(
    base: Option<&BTreeMap<String, String>>,
    content_type: &str,
) -> BTreeMap<String, String> {
    let mut headers = base.cloned().unwrap_or_default();
    headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());
    headers
}

/// `Set-Cookie` values for events that hand session state back.
pub fn session_headers(event: &RequestEvent) -> BTreeMap<String, Vec<String>> {
    if !event.returnable_session_state() {
        return BTreeMap::new();
    }
    match event.session() {
        Some(session) if !session.is_empty() => session.as_multi_value_headers(),
        _ => BTreeMap::new(),
    }
}
