//! Route patterns, routing keys and path-template matching.
//!
//! # Responsibilities
//! - Represent registration keys (bare symbol or structured tuple)
//! - Compare a path template against a concrete path, segment by segment
//! - Extract `{name}` wildcard values into path parameters
//!
//! # Design Decisions
//! - Positional comparison only: no backtracking, no globbing
//! - Segment counts must agree exactly
//! - Matching is case-sensitive

use std::collections::BTreeMap;
use std::fmt;

/// Protocol literal used for gateway request routing keys.
pub const API_PROTOCOL: &str = "API";

/// Path parameters extracted from a matched template, keyed by wildcard name.
pub type PathParams = BTreeMap<String, String>;

/// The `(protocol, qualifier, path-template)` form of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteTuple {
    pub protocol: String,
    pub qualifier: String,
    pub path: String,
}

impl RouteTuple {
    pub fn new(
        protocol: impl Into<String>,
        qualifier: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            qualifier: qualifier.into(),
            path: path.into(),
        }
    }

    /// Gateway routing tuple: `("API", method, path)`.
    pub fn api(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(API_PROTOCOL, method, path)
    }
}

/// A registration key, either a bare symbol or a structured tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RoutePattern {
    Symbol(String),
    Structured(RouteTuple),
}

/// Routing keys share the pattern representation; a key is looked up, a
/// pattern is registered.
pub type RoutingKey = RoutePattern;

impl RoutePattern {
    pub fn symbol(name: impl Into<String>) -> Self {
        RoutePattern::Symbol(name.into())
    }

    pub fn structured(
        protocol: impl Into<String>,
        qualifier: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        RoutePattern::Structured(RouteTuple::new(protocol, qualifier, path))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            RoutePattern::Symbol(s) => Some(s),
            RoutePattern::Structured(_) => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&RouteTuple> {
        match self {
            RoutePattern::Symbol(_) => None,
            RoutePattern::Structured(t) => Some(t),
        }
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutePattern::Symbol(s) => write!(f, "{}", s),
            RoutePattern::Structured(t) => {
                write!(f, "({}, {}, {})", t.protocol, t.qualifier, t.path)
            }
        }
    }
}

impl From<&str> for RoutePattern {
    fn from(symbol: &str) -> Self {
        RoutePattern::symbol(symbol)
    }
}

impl From<String> for RoutePattern {
    fn from(symbol: String) -> Self {
        RoutePattern::Symbol(symbol)
    }
}

impl From<(&str, &str, &str)> for RoutePattern {
    fn from((protocol, qualifier, path): (&str, &str, &str)) -> Self {
        RoutePattern::structured(protocol, qualifier, path)
    }
}

impl From<RouteTuple> for RoutePattern {
    fn from(tuple: RouteTuple) -> Self {
        RoutePattern::Structured(tuple)
    }
}

/// True when a template token has the `{name}` shape.
pub fn is_wildcard(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('{') && token.ends_with('}')
}

/// True when the last segment of a template is a wildcard.
pub fn ends_with_wildcard(template: &str) -> bool {
    segments(template).last().is_some_and(|t| is_wildcard(t))
}

/// Split a path on `/`, discarding the leading empty segment.
fn segments(path: &str) -> Vec<&str> {
    path.split('/').skip(1).collect()
}

/// Positional comparison of a template against a concrete path.
pub fn template_matches(template: &str, path: &str) -> bool {
    let template_xs = segments(template);
    let path_xs = segments(path);

    template_xs.len() == path_xs.len()
        && template_xs
            .iter()
            .zip(path_xs.iter())
            .all(|(t, p)| is_wildcard(t) || t == p)
}

/// Collect `{name} -> token` pairs for every wildcard segment of the template.
pub fn extract_path_params(template: &str, path: &str) -> PathParams {
    segments(template)
        .into_iter()
        .zip(segments(path))
        .filter(|(t, _)| is_wildcard(t))
        .map(|(t, p)| (t[1..t.len() - 1].to_string(), p.to_string()))
        .collect()
}
