//! Web session state carried by gateway requests.
//!
//! The session is read from the `cookie` request header and propagated back
//! as `Set-Cookie` multi-value headers.

use std::collections::BTreeMap;

pub const SET_COOKIE: &str = "Set-Cookie";

/// Ordered `name=value` cookie pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebSession {
    cookies: Vec<(String, String)>,
}

impl WebSession {
    /// Build a session from lower-cased request headers.
    pub fn from_headers(headers: &BTreeMap<String, String>) -> Option<Self> {
        let session = Self::parse_cookie_header(headers.get("cookie")?);
        (!session.is_empty()).then_some(session)
    }

    /// Parse a `Cookie` header value (`a=1; b=2`).
    pub fn parse_cookie_header(value: &str) -> Self {
        let cookies = value
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { cookies }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a cookie.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// `{"Set-Cookie": ["a=1", "b=2"]}`.
    pub fn as_multi_value_headers(&self) -> BTreeMap<String, Vec<String>> {
        let values = self
            .cookies
            .iter()
            .map(|(n, v)| format!("{}={}", n, v))
            .collect();
        BTreeMap::from([(SET_COOKIE.to_string(), values)])
    }
}
