//! Configuration loading for the request inspector.
//!
//! Settings are read from the `"inspector"` key of a JSON settings document,
//! merged over defaults and validated. There is no global configuration: the
//! loaded [`InspectorConfig`] is handed to [`crate::Inspector::new`], which
//! owns it.

pub mod schema;

pub use schema::InspectorConfig;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Errors produced while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid inspector configuration: {0}")]
    Invalid(String),
}

/// Loads configuration from a JSON settings document.
///
/// Reads the `"inspector"` settings, merges them with defaults and validates
/// the result. Settings that fail to deserialize are reported and the
/// defaults are used instead.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] if the merged configuration fails
/// validation.
///
/// # Example
///
/// ```
/// use request_inspector::config::load_config;
/// use serde_json::json;
///
/// let settings = json!({
///     "inspector": {
///         "path": "/debug/requests",
///         "capacity": 200
///     }
/// });
///
/// let config = load_config(Some(settings)).unwrap();
/// assert_eq!(config.path, "/debug/requests");
/// assert_eq!(config.capacity, 200);
/// ```
pub fn load_config(settings_json: Option<Value>) -> Result<InspectorConfig, ConfigError> {
    let mut config = InspectorConfig::default();

    if let Some(settings) = settings_json {
        if let Some(inspector_settings) = settings.get("inspector") {
            match serde_json::from_value::<InspectorConfig>(inspector_settings.clone()) {
                Ok(user_config) => {
                    config = config.merge(&user_config);
                }
                Err(e) => {
                    warn!(error = %e, "failed to parse inspector settings, using defaults");
                }
            }
        }
    }

    config.validate()?;

    Ok(config)
}
