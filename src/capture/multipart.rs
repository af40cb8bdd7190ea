//! Multipart form metadata extraction.
//!
//! The buffered body is run through axum's [`Multipart`] extractor. Text
//! fields are kept as values; for file fields only the name, type and size
//! are recorded. A malformed part ends extraction and whatever was read
//! before it is kept.

use crate::models::{MultipartForm, UploadedFile};
use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::header::CONTENT_TYPE;
use axum::http::Request;
use bytes::Bytes;
use tracing::debug;

/// Parses `body` as `multipart/form-data`.
///
/// `content_type` must be the full header value including the boundary.
/// Returns `None` when the request is not a usable multipart request.
pub async fn multipart_form(content_type: &str, body: Bytes) -> Option<MultipartForm> {
    let request = Request::builder()
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .ok()?;

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(error = %rejection, "request body is not valid multipart");
            return None;
        }
    };

    let mut form = MultipartForm::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "stopping at malformed multipart field");
                break;
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let part_type = field.content_type().map(str::to_string).unwrap_or_default();

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                debug!(field = %name, error = %e, "failed to read multipart field");
                break;
            }
        };

        match file_name {
            Some(filename) => form.file.entry(name).or_default().push(UploadedFile {
                filename,
                content_type: part_type,
                size: data.len(),
            }),
            None => form.value.append(name, String::from_utf8_lossy(&data).into_owned()),
        }
    }

    Some(form)
}
