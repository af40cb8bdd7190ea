//! Extraction of parameter groups from request parts and bodies.
//!
//! Every function here is infallible: input that cannot be decoded simply
//! contributes nothing to the resulting map.

use crate::flatten::{FlattenLimits, Flattener, MAX_DECODABLE_DEPTH};
use crate::models::ParamMap;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, Uri};
use mime::Mime;
use serde_json::error::Category;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::form_urlencoded;

/// Parsed `Content-Type` header.
///
/// `None` when the header is missing, not visible ASCII, or not a valid
/// media type. Type and subtype come back lowercased, so matching on
/// `(type_(), subtype())` is case-insensitive.
pub fn mime_type(headers: &HeaderMap) -> Option<Mime> {
    raw_content_type(headers)?.parse::<Mime>().ok()
}

/// Media type of the request body without parameters.
///
/// `Multipart/Form-Data; boundary=x` yields `multipart/form-data`. A header
/// that does not parse as a media type is kept as written, minus any
/// parameters; a missing header yields an empty string.
pub fn media_type(headers: &HeaderMap) -> String {
    if let Some(mime) = mime_type(headers) {
        return mime.essence_str().to_string();
    }

    raw_content_type(headers)
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_string())
        .unwrap_or_default()
}

/// Raw `Content-Type` header value, parameters included.
pub fn raw_content_type(headers: &HeaderMap) -> Option<&str> {
    headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok())
}

/// Decoded query string parameters.
pub fn query_params(uri: &Uri) -> ParamMap {
    uri.query()
        .map(|query| form_urlencoded::parse(query.as_bytes()).collect())
        .unwrap_or_default()
}

/// Decoded `application/x-www-form-urlencoded` body parameters.
pub fn form_params(body: &[u8]) -> ParamMap {
    form_urlencoded::parse(body).collect()
}

/// Every header, keyed by lowercase name. Non-UTF-8 values are decoded lossily.
pub fn header_params(headers: &HeaderMap) -> ParamMap {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

/// Cookies from every `Cookie` header.
///
/// Pairs without `=` or with an empty name are skipped; values wrapped in
/// double quotes are unwrapped.
pub fn cookie_params(headers: &HeaderMap) -> ParamMap {
    let mut cookies = ParamMap::new();

    for header in headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };

        for pair in header.split(';') {
            let Some((name, value)) = pair.trim().split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }

            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            cookies.append(name, value);
        }
    }

    cookies
}

/// Flattened JSON body, if the body is a JSON object.
///
/// Anything else (malformed JSON, arrays, scalars) yields `None`. When a
/// flattening limit is hit the keys produced so far are kept and a warning is
/// logged. Bodies nested beyond [`MAX_DECODABLE_DEPTH`] never decode, so they
/// yield `None` with a warning rather than a partial map.
pub fn json_params(body: &[u8], limits: &FlattenLimits) -> Option<ParamMap> {
    let object = match serde_json::from_slice::<Map<String, Value>>(body) {
        Ok(object) => object,
        Err(e) if is_recursion_limit(&e) => {
            warn!(
                error = %e,
                limit = MAX_DECODABLE_DEPTH,
                "JSON body nests too deeply to decode, recording no JSON group"
            );
            return None;
        }
        Err(e) => {
            debug!(error = %e, "request body is not a JSON object");
            return None;
        }
    };

    let flattened = Flattener::new(*limits).flatten(&object);
    if let Some(err) = &flattened.error {
        warn!(error = %err, kept = flattened.params.len(), "truncated flattened JSON body");
    }

    Some(flattened.params)
}

fn is_recursion_limit(err: &serde_json::Error) -> bool {
    err.classify() == Category::Syntax && err.to_string().starts_with("recursion limit exceeded")
}
