//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     register(pattern, handler, options)
//!     → table.rs (insert or overwrite, registration order kept)
//!
//! Resolution (per event):
//!     RoutingKey (symbol | (protocol, qualifier, path))
//!     → matcher.rs (exact lookup | template scan + ambiguity rule)
//!     → pattern.rs (positional path matching)
//!     → Return: matched RouteEntry or the no-route entry
//! ```
//!
//! # Design Decisions
//! - Table is an explicit object passed to the dispatcher, not a global
//! - Immutable after startup (shared via `Arc` without locks)
//! - Deterministic: same key always resolves to the same entry
//! - First-registered match wins unless every match ends in a wildcard

pub mod handlers;
pub mod matcher;
pub mod pattern;
pub mod table;

pub use matcher::PatternMatcher;
pub use pattern::{PathParams, RoutePattern, RouteTuple, RoutingKey};
pub use table::{Handler, RouteEntry, RouteOptions, RouteTable, NO_ROUTE_SYMBOL};
