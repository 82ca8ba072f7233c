//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Event normalization settings.
    pub normalizer: NormalizerConfig,

    /// Response rendering settings.
    pub response: ResponseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Event normalization configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Separator splitting a storage container name; the leading segment
    /// becomes the routing symbol.
    pub container_separator: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            container_separator: ".".to_string(),
        }
    }
}

/// Response rendering configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ResponseConfig {
    /// Status when a successful request sets no explicit status.
    pub default_success_code: u16,

    /// Status when a failed pipeline carries no error code.
    pub default_failure_code: u16,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            default_success_code: 200,
            default_failure_code: 400,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,

    /// Record dispatch counters and latency histograms.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            metrics_enabled: true,
        }
    }
}
