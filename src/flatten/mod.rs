//! Flattening of JSON bodies into form-style parameter maps.
//!
//! A decoded JSON object is turned into the same key syntax used by
//! conventional form encoding:
//!
//! - object field `k` under prefix `p` becomes `p.k` (or `k` at the top level)
//! - array element `i` under key `k` becomes `k[i]`; object elements are
//!   recursed into with `k[i]` as the new prefix
//! - every other value becomes a single string value
//!
//! ```
//! use request_inspector::flatten::{flatten_json, FlattenLimits};
//! use serde_json::json;
//!
//! let body = json!({"a": {"b": 1}, "c": [1, {"d": 2}]});
//! let params = flatten_json(body.as_object().unwrap(), &FlattenLimits::default()).unwrap();
//!
//! assert_eq!(params.get("a.b"), Some("1"));
//! assert_eq!(params.get("c[0]"), Some("1"));
//! assert_eq!(params.get("c[1].d"), Some("2"));
//! ```
//!
//! Object keys are visited in `serde_json::Map` order (sorted) and array
//! elements in index order. When two source paths produce the same flattened
//! key, the first one visited wins and later ones are dropped.

pub mod error;

pub use error::FlattenError;

use crate::models::ParamMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Default maximum nesting depth, counting the top-level object as 1.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Deepest nesting serde_json will decode. A body nested deeper fails to
/// parse before flattening starts, so larger depth limits never apply.
pub const MAX_DECODABLE_DEPTH: usize = 127;

/// Default maximum number of flattened keys per body.
pub const DEFAULT_MAX_KEYS: usize = 1000;

/// Bounds applied while flattening untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenLimits {
    /// Maximum nesting depth. The top-level object is depth 1 and every
    /// nested object or array adds one level.
    pub max_depth: usize,

    /// Maximum number of distinct flattened keys.
    pub max_keys: usize,
}

impl Default for FlattenLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_keys: DEFAULT_MAX_KEYS,
        }
    }
}

/// Result of a lossy flatten: whatever was produced, plus the limit that
/// stopped the walk early, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub params: ParamMap,
    pub error: Option<FlattenError>,
}

impl Flattened {
    /// `true` when the walk stopped before visiting the whole document.
    pub fn is_truncated(&self) -> bool {
        self.error.is_some()
    }
}

/// Walks a JSON object and accumulates flattened keys within [`FlattenLimits`].
#[derive(Debug)]
pub struct Flattener {
    limits: FlattenLimits,
    params: ParamMap,
}

impl Flattener {
    pub fn new(limits: FlattenLimits) -> Self {
        Self {
            limits,
            params: ParamMap::new(),
        }
    }

    /// Flattens `object`, stopping at the first breached limit.
    ///
    /// Keys produced before the limit was hit are kept.
    pub fn flatten(mut self, object: &Map<String, Value>) -> Flattened {
        let error = self.walk_object(object, "", 1).err();
        Flattened {
            params: self.params,
            error,
        }
    }

    fn walk_object(
        &mut self,
        object: &Map<String, Value>,
        prefix: &str,
        depth: usize,
    ) -> Result<(), FlattenError> {
        if depth > self.limits.max_depth {
            return Err(FlattenError::TooDeep {
                key: prefix.to_string(),
                limit: self.limits.max_depth,
            });
        }

        for (field, value) in object {
            let key = if prefix.is_empty() {
                field.clone()
            } else {
                format!("{}.{}", prefix, field)
            };

            match value {
                Value::Object(nested) => self.walk_object(nested, &key, depth + 1)?,
                Value::Array(items) => self.walk_array(items, &key, depth + 1)?,
                scalar => self.store(key, scalar_to_string(scalar))?,
            }
        }

        Ok(())
    }

    fn walk_array(&mut self, items: &[Value], key: &str, depth: usize) -> Result<(), FlattenError> {
        if depth > self.limits.max_depth {
            return Err(FlattenError::TooDeep {
                key: key.to_string(),
                limit: self.limits.max_depth,
            });
        }

        for (index, item) in items.iter().enumerate() {
            let item_key = format!("{}[{}]", key, index);
            match item {
                Value::Object(nested) => self.walk_object(nested, &item_key, depth + 1)?,
                other => self.store(item_key, scalar_to_string(other))?,
            }
        }

        Ok(())
    }

    fn store(&mut self, key: String, value: String) -> Result<(), FlattenError> {
        if self.params.contains_key(&key) {
            debug!(key = %key, "dropping duplicate flattened JSON key");
            return Ok(());
        }
        if self.params.len() >= self.limits.max_keys {
            return Err(FlattenError::TooManyKeys {
                limit: self.limits.max_keys,
            });
        }

        self.params.insert_if_absent(key, vec![value]);
        Ok(())
    }
}

/// Flattens `object`, failing if any limit is breached.
///
/// # Errors
///
/// Returns [`FlattenError::TooDeep`] or [`FlattenError::TooManyKeys`]; the
/// partial result is discarded. Use [`Flattener`] to keep it.
pub fn flatten_json(
    object: &Map<String, Value>,
    limits: &FlattenLimits,
) -> Result<ParamMap, FlattenError> {
    let flattened = Flattener::new(*limits).flatten(object);
    match flattened.error {
        Some(err) => Err(err),
        None => Ok(flattened.params),
    }
}

/// Canonical string form of a non-object JSON value.
///
/// Strings are taken verbatim, nested arrays are rendered as compact JSON.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
