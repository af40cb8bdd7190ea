//! Multi-valued string parameter maps.
//!
//! Every parameter group of a snapshot (query, form, JSON, headers, cookies)
//! is a mapping from a unique key to one or more values kept in arrival order.
//! Serialized, a map looks like `{"key": ["v1", "v2"]}`.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// A mapping from string keys to one-or-many string values.
///
/// Keys are kept sorted so that serialized output is stable; values under a
/// key keep the order in which they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap(BTreeMap<String, Vec<String>>);

impl ParamMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Appends a value under `key`, keeping any values already present.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Sets `key` to `values` only if the key is not present yet.
    ///
    /// # Returns
    ///
    /// `true` if the values were stored, `false` if the key already existed
    /// and the map was left untouched.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, values: Vec<String>) -> bool {
        match self.0.entry(key.into()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(values);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value stored under `key`, in arrival order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ParamMap::new();
        for (key, value) in iter {
            map.append(key, value);
        }
        map
    }
}
