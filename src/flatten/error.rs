//! JSON flattening error types.

use thiserror::Error;

/// Limits breached while flattening a JSON body.
///
/// These never abort a capture. The flattener keeps every key produced before
/// the limit was hit and reports the condition so capture can log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlattenError {
    /// Nesting below `key` goes deeper than the configured maximum.
    #[error("JSON nesting under '{key}' exceeds the maximum depth of {limit}")]
    TooDeep { key: String, limit: usize },

    /// The document produces more distinct keys than allowed.
    #[error("flattened JSON exceeds the maximum of {limit} keys")]
    TooManyKeys { limit: usize },
}
