//! Configuration schema for the request inspector.
//!
//! This module defines the settings structure, its defaults and the
//! validation rules applied before an inspector is built from it.

use super::ConfigError;
use crate::flatten::{FlattenLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_KEYS, MAX_DECODABLE_DEPTH};
use crate::pagination::PaginationDefaults;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the request inspector.
///
/// Settings are read from the `"inspector"` key of a JSON settings document.
/// Missing settings fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectorConfig {
    /// Path of the inspection endpoint. Defaults to `/_inspector`.
    ///
    /// Must start with `/`.
    #[serde(default = "default_path")]
    pub path: String,

    /// Maximum number of snapshots kept in memory.
    ///
    /// When the store is full the oldest snapshot is evicted. Defaults to 1000.
    ///
    /// Must be > 0.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Page size used when `per_page` is missing or not a positive number.
    /// Defaults to 20.
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    /// Upper bound for `per_page`; larger requests are clamped. Defaults to 500.
    ///
    /// Must be >= `default_per_page`.
    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,

    /// Largest request body buffered for inspection, in bytes.
    ///
    /// Bigger bodies are passed downstream untouched and their form, multipart
    /// and JSON groups stay empty. Defaults to 10 MiB.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Maximum JSON nesting depth flattened per body. Defaults to 32.
    #[serde(default = "default_max_json_depth")]
    pub max_json_depth: usize,

    /// Maximum number of flattened JSON keys per body. Defaults to 1000.
    #[serde(default = "default_max_json_keys")]
    pub max_json_keys: usize,

    /// Whether `X-Forwarded-For` and `X-Real-IP` are consulted when resolving
    /// the client address. Defaults to true.
    ///
    /// Disable this when the server is reachable without a reverse proxy, as
    /// clients can set these headers freely.
    #[serde(default = "default_trust_forwarded_headers")]
    pub trust_forwarded_headers: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            capacity: default_capacity(),
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            max_body_bytes: default_max_body_bytes(),
            max_json_depth: default_max_json_depth(),
            max_json_keys: default_max_json_keys(),
            trust_forwarded_headers: default_trust_forwarded_headers(),
        }
    }
}

impl InspectorConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.path.starts_with('/') {
            return Err(ConfigError::Invalid("path must start with '/'".to_string()));
        }

        if self.capacity == 0 {
            return Err(ConfigError::Invalid(
                "capacity must be greater than 0".to_string(),
            ));
        }

        if self.default_per_page == 0 {
            return Err(ConfigError::Invalid(
                "defaultPerPage must be greater than 0".to_string(),
            ));
        }

        if self.max_per_page < self.default_per_page {
            return Err(ConfigError::Invalid(
                "maxPerPage must not be less than defaultPerPage".to_string(),
            ));
        }

        if self.max_json_depth == 0 || self.max_json_keys == 0 {
            return Err(ConfigError::Invalid(
                "maxJsonDepth and maxJsonKeys must be greater than 0".to_string(),
            ));
        }

        if self.max_json_depth > MAX_DECODABLE_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "maxJsonDepth must not exceed {}",
                MAX_DECODABLE_DEPTH
            )));
        }

        // max_body_bytes may be 0, which disables body inspection entirely.

        Ok(())
    }

    /// Merges this configuration with another, using values from `other`.
    pub fn merge(&self, other: &InspectorConfig) -> Self {
        Self {
            path: other.path.clone(),
            capacity: other.capacity,
            default_per_page: other.default_per_page,
            max_per_page: other.max_per_page,
            max_body_bytes: other.max_body_bytes,
            max_json_depth: other.max_json_depth,
            max_json_keys: other.max_json_keys,
            trust_forwarded_headers: other.trust_forwarded_headers,
        }
    }

    /// Flattening bounds derived from the JSON settings.
    pub fn flatten_limits(&self) -> FlattenLimits {
        FlattenLimits {
            max_depth: self.max_json_depth,
            max_keys: self.max_json_keys,
        }
    }

    /// Paging defaults derived from the page-size settings.
    pub fn pagination_defaults(&self) -> PaginationDefaults {
        PaginationDefaults {
            per_page: self.default_per_page,
            max_per_page: self.max_per_page,
        }
    }
}

// Default value functions for serde

fn default_path() -> String {
    "/_inspector".to_string()
}

fn default_capacity() -> usize {
    1000
}

fn default_per_page() -> usize {
    20
}

fn default_max_per_page() -> usize {
    500
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_json_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_max_json_keys() -> usize {
    DEFAULT_MAX_KEYS
}

fn default_trust_forwarded_headers() -> bool {
    true
}
