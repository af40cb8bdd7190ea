//! Request Inspector Demo Server
//!
//! Serves a small axum application with the inspector attached, so captured
//! requests can be browsed at `http://127.0.0.1:8080/_inspector`.
//!
//! # Routes
//!
//! - `GET /` returns a greeting
//! - `POST /echo` returns the request body unchanged, showing that capture
//!   leaves the body readable for handlers
//! - anything else returns 404 and is still captured
//!
//! Log output is controlled with `RUST_LOG`, e.g.
//! `RUST_LOG=request_inspector=debug`.

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use request_inspector::{load_config, Inspector};
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LISTEN_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting inspector demo");

    let inspector = match load_config(None).and_then(Inspector::new) {
        Ok(inspector) => inspector,
        Err(e) => {
            error!(error = %e, "invalid inspector configuration");
            std::process::exit(1);
        }
    };
    let inspection_path = inspector.config().path.clone();

    let app = inspector.attach(
        Router::new()
            .route("/", get(|| async { "request inspector demo" }))
            .route("/echo", post(|body: Bytes| async move { body }))
            .fallback(|| async { (StatusCode::NOT_FOUND, "not found") }),
    );

    let listener = match tokio::net::TcpListener::bind(LISTEN_ADDR).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = LISTEN_ADDR, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(addr = LISTEN_ADDR, path = %inspection_path, "server ready");

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(e) = server.await {
        error!(error = %e, "server error");
    }

    info!("server shut down gracefully");
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to install SIGINT handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {
                info!("received SIGINT");
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("received Ctrl+C");
    }
}
