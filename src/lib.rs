//! In-process HTTP request recorder.
//!
//! This crate provides an axum middleware that records a normalized snapshot of
//! every request passing through a server and serves the recorded snapshots,
//! newest first, from a paginated JSON endpoint.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **flatten**: Converts nested JSON bodies into form-style `a.b[0].c` keys
//! - **models**: Snapshot records, parameter maps and the page projection
//! - **capture**: Builds snapshots from request parts and buffered bodies
//! - **store**: Bounded, newest-first in-memory snapshot ring
//! - **pagination**: Page arithmetic and navigation links over the store
//! - **middleware**: Routes requests to capture or to the inspection view
//! - **config**: Settings schema, defaults and validation
//!
//! # Request flow
//!
//! For every request that is not a `GET` on the inspection path, the
//! middleware:
//! 1. Records the arrival time
//! 2. Buffers the body (up to `maxBodyBytes`) and restores it for the handlers
//! 3. Extracts query, form, multipart, JSON, header and cookie parameters
//! 4. Runs the inner handlers
//! 5. Stamps the response status and prepends the snapshot to the store
//!
//! A `GET` on the inspection path (`/_inspector` by default) returns a page
//! selected by the `page` and `per_page` query parameters.
//!
//! # Usage
//!
//! ```no_run
//! use axum::{routing::post, Router};
//! use request_inspector::{config::load_config, Inspector};
//! use std::net::SocketAddr;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let inspector = Inspector::new(load_config(None)?)?;
//! let app = inspector.attach(Router::new().route("/users", post(|| async { "created" })));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(
//!     listener,
//!     app.into_make_service_with_connect_info::<SocketAddr>(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Serving with `into_make_service_with_connect_info` lets the inspector fall
//! back to the peer address when no forwarding headers are present.

pub mod capture;
pub mod config;
pub mod flatten;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod store;

// Re-export commonly used types
pub use config::{load_config, ConfigError, InspectorConfig};
pub use flatten::{flatten_json, FlattenError, FlattenLimits};
pub use middleware::{inspect, Inspector};
pub use models::{MultipartForm, PageView, ParamMap, RequestSnapshot, UploadedFile};
pub use pagination::{paginate, PageRequest};
pub use store::SnapshotStore;
