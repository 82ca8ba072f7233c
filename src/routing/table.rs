//! Route registry.
//!
//! # Responsibilities
//! - Store `(pattern, handler, options)` entries
//! - Exact lookup for symbol patterns, reverse lookup by handler
//! - Provide the no-route fallback entry
//!
//! # Design Decisions
//! - Built once at startup, then shared read-only (typically via `Arc`)
//! - Re-registering a pattern overwrites in place: last writer wins, first
//!   registration keeps its position for tie-breaks
//! - A route registered under the no-route symbol replaces the built-in fallback

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::events::body::BodyDecoder;
use crate::pipeline::{PipelineOutcome, Request};
use crate::routing::handlers;
use crate::routing::pattern::{RoutePattern, RouteTuple};

/// Reserved symbol used when no real route can be determined.
pub const NO_ROUTE_SYMBOL: &str = "no_matching_route";

type HandlerFn = dyn Fn(Request) -> PipelineOutcome + Send + Sync;

/// A shareable handle to a route handler.
///
/// Handles compare by identity: two clones of the same handle are the same
/// handler, two handles built from the same function are not.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    func: Arc<HandlerFn>,
}

impl Handler {
    pub fn new<F>(name: impl AsRef<str>, func: F) -> Self
    where
        F: Fn(Request) -> PipelineOutcome + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.as_ref()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, request: Request) -> PipelineOutcome {
        (self.func)(request)
    }

    /// Identity comparison.
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}

/// Per-route options.
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Replaces the default gateway body handling (base64 decode or pass-through).
    pub decode_body: Option<BodyDecoder>,
    /// Free-form options not interpreted by the dispatcher.
    pub extra: Map<String, Value>,
}

impl RouteOptions {
    pub fn with_body_decoder(mut self, decoder: BodyDecoder) -> Self {
        self.decode_body = Some(decoder);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: RoutePattern,
    pub handler: Handler,
    pub options: RouteOptions,
}

/// Registry mapping route patterns to handlers.
#[derive(Debug)]
pub struct RouteTable {
    /// Entries in first-registration order.
    entries: Vec<RouteEntry>,
    /// Pattern to position in `entries`.
    index: HashMap<RoutePattern, usize>,
    /// Symbol that selects the no-route entry.
    no_route_symbol: String,
    /// Built-in entry used when nothing is registered under the no-route symbol.
    fallback: RouteEntry,
}

impl RouteTable {
    /// Create an empty table using the standard no-route symbol.
    pub fn new() -> Self {
        Self::with_no_route_symbol(NO_ROUTE_SYMBOL)
    }

    pub fn with_no_route_symbol(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        let fallback = RouteEntry {
            pattern: RoutePattern::Symbol(symbol.clone()),
            handler: Handler::new("default_no_route", handlers::default_no_route),
            options: RouteOptions::default(),
        };
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            no_route_symbol: symbol,
            fallback,
        }
    }

    /// Insert or overwrite the entry for `pattern`.
    pub fn register(
        &mut self,
        pattern: impl Into<RoutePattern>,
        handler: Handler,
        options: RouteOptions,
    ) {
        let pattern = pattern.into();
        tracing::debug!(pattern = %pattern, handler = %handler.name(), "Registering route");

        let entry = RouteEntry {
            pattern: pattern.clone(),
            handler,
            options,
        };
        match self.index.get(&pattern) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(pattern, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Register a handler built from a plain function or closure.
    pub fn route<F>(&mut self, pattern: impl Into<RoutePattern>, name: &str, func: F)
    where
        F: Fn(Request) -> PipelineOutcome + Send + Sync + 'static,
    {
        self.register(pattern, Handler::new(name, func), RouteOptions::default());
    }

    /// Exact lookup of a symbol pattern.
    pub fn lookup_by_symbol(&self, key: &str) -> Option<&RouteEntry> {
        self.index
            .get(&RoutePattern::symbol(key))
            .map(|&pos| &self.entries[pos])
    }

    /// Pattern of the first entry (registration order) holding `handler`.
    pub fn lookup_by_handler(&self, handler: &Handler) -> Option<&RoutePattern> {
        self.entries
            .iter()
            .find(|e| e.handler.same_as(handler))
            .map(|e| &e.pattern)
    }

    /// The entry used whenever resolution fails.
    pub fn no_route_entry(&self) -> &RouteEntry {
        self.lookup_by_symbol(&self.no_route_symbol)
            .unwrap_or(&self.fallback)
    }

    /// Tuple-keyed entries in registration order.
    pub fn structured_entries(&self) -> impl Iterator<Item = (&RouteTuple, &RouteEntry)> {
        self.entries
            .iter()
            .filter_map(|e| e.pattern.as_tuple().map(|t| (t, e)))
    }

    /// All registered patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &RoutePattern> {
        self.entries.iter().map(|e| &e.pattern)
    }

    pub fn no_route_symbol(&self) -> &str {
        &self.no_route_symbol
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handlers::noop_response;

    fn handler(name: &str) -> Handler {
        Handler::new(name, noop_response)
    }

    #[test]
    fn test_register_and_lookup_symbol() {
        let mut table = RouteTable::new();
        let h = handler("hello");
        table.register("hello", h.clone(), RouteOptions::default());

        let entry = table.lookup_by_symbol("hello").unwrap();
        assert!(entry.handler.same_as(&h));
        assert!(table.lookup_by_symbol("missing").is_none());
    }

    #[test]
    fn test_last_writer_wins_keeps_position() {
        let mut table = RouteTable::new();
        let h1 = handler("first");
        let h2 = handler("second");
        table.register("a", h1, RouteOptions::default());
        table.register("b", handler("b"), RouteOptions::default());
        table.register("a", h2.clone(), RouteOptions::default());

        assert_eq!(table.len(), 2);
        assert!(table.lookup_by_symbol("a").unwrap().handler.same_as(&h2));
        let order: Vec<String> = table.patterns().map(|p| p.to_string()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_lookup_returns_options() {
        let mut table = RouteTable::new();
        let options = RouteOptions::default()
            .with_body_decoder(crate::events::body::json_body)
            .with_extra("timeout_ms", 250);
        table.register("orders", handler("orders"), options);

        let entry = table.lookup_by_symbol("orders").unwrap();
        assert!(entry.options.decode_body.is_some());
        assert_eq!(entry.options.extra["timeout_ms"], 250);
    }

    #[test]
    fn test_repeated_registration_is_idempotent() {
        let mut table = RouteTable::new();
        let h = handler("hello");
        table.register("hello", h.clone(), RouteOptions::default());
        table.register("hello", h.clone(), RouteOptions::default());

        assert_eq!(table.len(), 1);
        assert!(table.lookup_by_symbol("hello").unwrap().handler.same_as(&h));
    }

    #[test]
    fn test_lookup_by_handler() {
        let mut table = RouteTable::new();
        let h = handler("resource");
        table.register(("API", "GET", "/r/{id}"), h.clone(), RouteOptions::default());

        assert_eq!(
            table.lookup_by_handler(&h),
            Some(&RoutePattern::from(("API", "GET", "/r/{id}")))
        );
        assert!(table.lookup_by_handler(&handler("other")).is_none());
    }

    #[test]
    fn test_no_route_entry_prefers_registration() {
        let mut table = RouteTable::new();
        assert_eq!(table.no_route_entry().handler.name(), "default_no_route");

        table.register(NO_ROUTE_SYMBOL, handler("custom_404"), RouteOptions::default());
        assert_eq!(table.no_route_entry().handler.name(), "custom_404");
    }

    #[test]
    fn test_structured_entries_skip_symbols() {
        let mut table = RouteTable::new();
        table.register("hello", handler("hello"), RouteOptions::default());
        table.register(("API", "GET", "/a"), handler("a"), RouteOptions::default());

        let tuples: Vec<&str> = table.structured_entries().map(|(t, _)| t.path.as_str()).collect();
        assert_eq!(tuples, vec!["/a"]);
    }
}
