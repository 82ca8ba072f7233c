//! Route resolution.
//!
//! # Responsibilities
//! - Resolve symbol keys by exact lookup
//! - Resolve structured keys by scanning tuple routes with the path matcher
//! - Apply the ambiguity rule when several templates match
//!
//! # Design Decisions
//! - Every failure resolves to the no-route entry, never to an error
//! - Multiple matches whose templates all end in a wildcard are ambiguous
//! - Otherwise the first-registered match wins, regardless of specificity

use crate::routing::pattern::{ends_with_wildcard, template_matches, RoutingKey, RouteTuple};
use crate::routing::table::{RouteEntry, RouteTable};

/// Resolves routing keys against a [`RouteTable`].
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher<'a> {
    table: &'a RouteTable,
}

impl<'a> PatternMatcher<'a> {
    pub fn new(table: &'a RouteTable) -> Self {
        Self { table }
    }

    /// Resolve a key to the entry that should handle it.
    pub fn resolve(&self, key: &RoutingKey) -> &'a RouteEntry {
        match key {
            RoutingKey::Symbol(symbol) => self
                .table
                .lookup_by_symbol(symbol)
                .unwrap_or_else(|| self.table.no_route_entry()),
            RoutingKey::Structured(tuple) => self.resolve_structured(tuple),
        }
    }

    /// All tuple routes matching `key`, in registration order.
    pub fn candidates(&self, key: &RouteTuple) -> Vec<&'a RouteEntry> {
        self.table
            .structured_entries()
            .filter(|(t, _)| {
                t.protocol == key.protocol
                    && t.qualifier == key.qualifier
                    && template_matches(&t.path, &key.path)
            })
            .map(|(_, e)| e)
            .collect()
    }

    fn resolve_structured(&self, key: &RouteTuple) -> &'a RouteEntry {
        let matches = self.candidates(key);

        match matches.as_slice() {
            [] => {
                tracing::debug!(path = %key.path, method = %key.qualifier, "No route matched");
                self.table.no_route_entry()
            }
            [only] => *only,
            [first, ..] => {
                let all_wildcard = matches.iter().all(|e| {
                    e.pattern
                        .as_tuple()
                        .is_some_and(|t| ends_with_wildcard(&t.path))
                });
                if all_wildcard {
                    tracing::warn!(
                        path = %key.path,
                        candidates = matches.len(),
                        "Ambiguous templated routes; resolving to no-route"
                    );
                    self.table.no_route_entry()
                } else {
                    *first
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handlers::noop_response;
    use crate::routing::pattern::RoutePattern;
    use crate::routing::table::{Handler, RouteOptions};

    fn table_with(patterns: &[(&str, &str, &str)]) -> RouteTable {
        let mut table = RouteTable::new();
        for (i, p) in patterns.iter().enumerate() {
            table.register(*p, Handler::new(format!("h{}", i), noop_response), RouteOptions::default());
        }
        table
    }

    fn api(path: &str) -> RoutingKey {
        RoutingKey::from(("API", "GET", path))
    }

    #[test]
    fn test_symbol_hit_and_miss() {
        let mut table = RouteTable::new();
        table.route("hello", "hello", noop_response);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.resolve(&RoutingKey::from("hello")).handler.name(), "hello");
        assert_eq!(
            matcher.resolve(&RoutingKey::from("nope")).handler.name(),
            "default_no_route"
        );
    }

    #[test]
    fn test_single_match_on_segment_count() {
        let table = table_with(&[("API", "GET", "/r/{id}"), ("API", "GET", "/r/{id}/x/{id2}")]);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.resolve(&api("/r/5")).handler.name(), "h0");
        assert_eq!(matcher.resolve(&api("/r/5/x/6")).handler.name(), "h1");
    }

    #[test]
    fn test_first_registered_wins_over_literal() {
        let table = table_with(&[("API", "GET", "/r/{id}"), ("API", "GET", "/r/lit")]);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.candidates(api("/r/lit").as_tuple().unwrap()).len(), 2);
        assert_eq!(matcher.resolve(&api("/r/lit")).handler.name(), "h0");

        let table = table_with(&[("API", "GET", "/r/lit"), ("API", "GET", "/r/{id}")]);
        let matcher = PatternMatcher::new(&table);
        assert_eq!(matcher.resolve(&api("/r/lit")).handler.name(), "h0");
    }

    #[test]
    fn test_all_wildcard_matches_are_ambiguous() {
        let table = table_with(&[("API", "GET", "/r/{id}"), ("API", "GET", "/r/{name}")]);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.resolve(&api("/r/5")).handler.name(), "default_no_route");
    }

    #[test]
    fn test_protocol_and_qualifier_must_match() {
        let table = table_with(&[("API", "POST", "/r/{id}")]);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.resolve(&api("/r/5")).handler.name(), "default_no_route");
        let key = RoutePattern::from(("API", "POST", "/r/5"));
        assert_eq!(matcher.resolve(&key).handler.name(), "h0");
    }

    #[test]
    fn test_symbol_routes_never_match_structured_keys() {
        let mut table = RouteTable::new();
        table.route("/r/5", "symbol", noop_response);
        let matcher = PatternMatcher::new(&table);

        assert_eq!(matcher.resolve(&api("/r/5")).handler.name(), "default_no_route");
    }
}
