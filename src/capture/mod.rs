//! Request capture.
//!
//! Turns one in-flight request into a [`RequestSnapshot`]. Capture is split
//! in two steps so that the snapshot can carry the real response status:
//!
//! 1. [`SnapshotBuilder::capture`] reads everything it needs from the request
//!    before the handlers run and returns a [`PendingSnapshot`]
//! 2. [`PendingSnapshot::finish`] stamps the response status once the
//!    handlers are done and yields the immutable snapshot
//!
//! No step can fail. Malformed forms, multipart bodies or JSON leave the
//! corresponding group empty.

pub mod body;
pub mod client_ip;
pub mod multipart;
pub mod params;

pub use body::buffer_body;
pub use client_ip::client_ip;

use crate::config::InspectorConfig;
use crate::flatten::FlattenLimits;
use crate::models::{ParamMap, RequestSnapshot};
use axum::extract::ConnectInfo;
use axum::http::request::Parts;
use axum::http::StatusCode;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::net::SocketAddr;

/// Builds snapshots according to the capture settings.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    limits: FlattenLimits,
    trust_forwarded_headers: bool,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new(FlattenLimits::default(), true)
    }
}

impl SnapshotBuilder {
    pub fn new(limits: FlattenLimits, trust_forwarded_headers: bool) -> Self {
        Self {
            limits,
            trust_forwarded_headers,
        }
    }

    pub fn from_config(config: &InspectorConfig) -> Self {
        Self::new(config.flatten_limits(), config.trust_forwarded_headers)
    }

    /// Captures the request described by `parts`.
    ///
    /// `body` is the fully buffered request body, or `None` when it was not
    /// buffered (too large, or the stream failed), in which case the form,
    /// multipart and JSON groups stay empty.
    pub async fn capture(
        &self,
        parts: &Parts,
        body: Option<Bytes>,
        requested_at: DateTime<Utc>,
    ) -> PendingSnapshot {
        let content_type = params::media_type(&parts.headers);
        let mime = params::mime_type(&parts.headers);

        let mut post_params = ParamMap::new();
        let mut post_multipart = None;
        let mut json = None;

        if let Some(body) = body.filter(|b| !b.is_empty()) {
            if let Some(mime) = &mime {
                match (mime.type_().as_str(), mime.subtype().as_str()) {
                    ("application", "x-www-form-urlencoded") => {
                        post_params = params::form_params(&body)
                    }
                    ("multipart", "form-data") => {
                        if let Some(raw) = params::raw_content_type(&parts.headers) {
                            post_multipart = multipart::multipart_form(raw, body.clone()).await;
                        }
                    }
                    (_, _) => {}
                }
            }

            json = params::json_params(&body, &self.limits);
        }

        let peer_addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        PendingSnapshot {
            snapshot: RequestSnapshot {
                requested_at,
                request_url: parts.uri.path().to_string(),
                http_method: parts.method.as_str().to_string(),
                http_status: StatusCode::OK.as_u16(),
                content_type,
                get_params: params::query_params(&parts.uri),
                post_params,
                json,
                post_multipart,
                client_ip: client_ip(&parts.headers, peer_addr, self.trust_forwarded_headers),
                cookies: params::cookie_params(&parts.headers),
                headers: params::header_params(&parts.headers),
            },
        }
    }
}

/// A captured request still waiting for its response status.
#[derive(Debug, Clone)]
pub struct PendingSnapshot {
    snapshot: RequestSnapshot,
}

impl PendingSnapshot {
    pub fn request_url(&self) -> &str {
        &self.snapshot.request_url
    }

    /// Records the response status and returns the finished snapshot.
    pub fn finish(mut self, status: StatusCode) -> RequestSnapshot {
        self.snapshot.http_status = status.as_u16();
        self.snapshot
    }
}
