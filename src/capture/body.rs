//! Request body buffering.
//!
//! Capture needs the whole body in memory, but the handlers behind the
//! inspector must still be able to read it. [`buffer_body`] drains the body
//! into memory and hands back a replacement that yields the same bytes.
//! Bodies over the limit, and bodies whose stream fails, are handed on
//! unchanged: the chunks already read are replayed first, followed by the
//! rest of the original stream (or its error).

use axum::body::Body;
use bytes::{Bytes, BytesMut};
use futures_util::stream::{self, StreamExt};
use tracing::debug;

/// Reads `body` into memory if it fits within `limit` bytes.
///
/// # Returns
///
/// A body to pass downstream, and the buffered bytes when the whole body was
/// read within the limit. Downstream always receives the complete original
/// content either way.
pub async fn buffer_body(body: Body, limit: usize) -> (Body, Option<Bytes>) {
    let mut data = body.into_data_stream();
    let mut chunks: Vec<Bytes> = Vec::new();
    let mut read = 0usize;

    while let Some(next) = data.next().await {
        match next {
            Ok(chunk) => {
                read += chunk.len();
                chunks.push(chunk);

                if read > limit {
                    debug!(limit, "request body exceeds capture limit, skipping inspection");
                    let replayed = stream::iter(chunks.into_iter().map(Ok::<Bytes, axum::Error>));
                    return (Body::from_stream(replayed.chain(data)), None);
                }
            }
            Err(err) => {
                debug!(error = %err, "failed to read request body during capture");
                let mut replayed: Vec<Result<Bytes, axum::Error>> =
                    chunks.into_iter().map(Ok).collect();
                replayed.push(Err(err));
                return (Body::from_stream(stream::iter(replayed)), None);
            }
        }
    }

    let bytes = concat(chunks, read);
    (Body::from(bytes.clone()), Some(bytes))
}

fn concat(mut chunks: Vec<Bytes>, len: usize) -> Bytes {
    if chunks.len() == 1 {
        return chunks.pop().unwrap_or_default();
    }

    let mut buf = BytesMut::with_capacity(len);
    for chunk in chunks {
        buf.extend_from_slice(&chunk);
    }
    buf.freeze()
}
