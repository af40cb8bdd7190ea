//! Request dispatch for the inspector middleware.
//!
//! Every request passing through the middleware is routed one of two ways:
//!
//! - `GET` on the inspection path is answered directly with a JSON page of
//!   captured requests and never reaches the inner handlers
//! - everything else is captured, forwarded to the inner handlers with its
//!   body intact, and stored once the response status is known
//!
//! Non-`GET` requests on the inspection path pass through uncaptured.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use request_inspector::{Inspector, InspectorConfig};
//!
//! let inspector = Inspector::new(InspectorConfig::default()).unwrap();
//! let app: Router = inspector.attach(Router::new().route("/", get(|| async { "hello" })));
//! ```

use crate::capture::{buffer_body, SnapshotBuilder};
use crate::config::{ConfigError, InspectorConfig};
use crate::models::PageView;
use crate::pagination::{paginate, PageRequest};
use crate::store::SnapshotStore;
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Owned inspector state: configuration, snapshot builder and store.
///
/// Cheap to clone; clones share the same store.
#[derive(Debug, Clone)]
pub struct Inspector {
    inner: Arc<InspectorInner>,
}

#[derive(Debug)]
struct InspectorInner {
    config: InspectorConfig,
    builder: SnapshotBuilder,
    store: Arc<SnapshotStore>,
}

impl Inspector {
    /// Creates an inspector with a fresh store sized by `config.capacity`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(config: InspectorConfig) -> Result<Self, ConfigError> {
        let store = Arc::new(SnapshotStore::with_capacity(config.capacity));
        Self::with_store(config, store)
    }

    /// Creates an inspector that records into an existing store.
    ///
    /// The store's own capacity applies; `config.capacity` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn with_store(
        config: InspectorConfig,
        store: Arc<SnapshotStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            inner: Arc::new(InspectorInner {
                builder: SnapshotBuilder::from_config(&config),
                config,
                store,
            }),
        })
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.inner.store
    }

    /// Computes the page selected by a raw query string such as
    /// `page=2&per_page=10`.
    pub fn page(&self, query: Option<&str>) -> PageView {
        let request = PageRequest::from_query(query, &self.inner.config.pagination_defaults());
        paginate(&self.inner.store, request, &self.inner.config.path)
    }

    /// Wraps every route of `router`, including its fallback, with the
    /// inspector middleware.
    pub fn attach<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(middleware::from_fn_with_state(self.clone(), inspect))
    }

    fn is_inspection_request(&self, request: &Request) -> bool {
        request.uri().path() == self.inner.config.path
    }

    /// Captures `request`, runs it through `next` and stores the snapshot.
    async fn record(&self, request: Request, next: Next) -> Response {
        let requested_at = Utc::now();
        let (parts, body) = request.into_parts();

        let (body, buffered) = buffer_body(body, self.inner.config.max_body_bytes).await;
        let pending = self.inner.builder.capture(&parts, buffered, requested_at).await;

        let response = next.run(Request::from_parts(parts, body)).await;

        let snapshot = pending.finish(response.status());
        debug!(
            method = %snapshot.http_method,
            path = %snapshot.request_url,
            status = snapshot.http_status,
            "captured request"
        );
        let evicted = self.inner.store.push(snapshot);
        if evicted > 0 {
            debug!(evicted, "evicted oldest request snapshot");
        }

        response
    }
}

/// Inspector middleware, for use with [`axum::middleware::from_fn_with_state`].
pub async fn inspect(
    State(inspector): State<Inspector>,
    request: Request,
    next: Next,
) -> Response {
    if inspector.is_inspection_request(&request) {
        if request.method() == Method::GET {
            let view = inspector.page(request.uri().query());
            return Json(view).into_response();
        }
        return next.run(request).await;
    }

    inspector.record(request, next).await
}
