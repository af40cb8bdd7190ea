//! Captured request records.
//!
//! A [`RequestSnapshot`] is built once per captured request and handed to the
//! store behind an `Arc`, after which nothing can mutate it.

use super::params::ParamMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single captured request.
///
/// Field names match the JSON served by the inspection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSnapshot {
    /// When the request entered the inspector, in UTC.
    pub requested_at: DateTime<Utc>,

    /// Request path, without the query string.
    pub request_url: String,

    /// HTTP method as sent by the client (`GET`, `POST`, ...).
    pub http_method: String,

    /// Status code of the response produced by the downstream handlers.
    pub http_status: u16,

    /// Media type of the request body with parameters stripped
    /// (`multipart/form-data; boundary=x` becomes `multipart/form-data`).
    /// Empty when the request carries no `Content-Type`.
    pub content_type: String,

    /// Query string parameters.
    pub get_params: ParamMap,

    /// `application/x-www-form-urlencoded` body parameters.
    pub post_params: ParamMap,

    /// Flattened JSON body, or `None` when the body is not a JSON object.
    pub json: Option<ParamMap>,

    /// Multipart form metadata, or `None` when the body is not multipart.
    pub post_multipart: Option<MultipartForm>,

    /// Resolved client address.
    pub client_ip: String,

    pub cookies: ParamMap,

    /// Request headers keyed by lowercase header name.
    pub headers: ParamMap,
}

/// Metadata extracted from a `multipart/form-data` body.
///
/// File contents are never retained, only their names, types and sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipartForm {
    /// Plain text fields.
    pub value: ParamMap,

    /// File fields keyed by form field name.
    pub file: BTreeMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.file.is_empty()
    }

    /// Total number of uploaded files across all fields.
    pub fn file_count(&self) -> usize {
        self.file.values().map(Vec::len).sum()
    }
}

/// One uploaded file within a multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    /// Part content type, empty when the part did not declare one.
    pub content_type: String,
    /// Size of the part body in bytes.
    pub size: usize,
}
