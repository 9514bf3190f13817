//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics`. Metrics come from the default
//! prometheus registry, so anything registered by other crates shows up.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

/// Render the default registry in the text exposition format.
pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub fn router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(|| async { encode_metrics() }))
}

/// Bind the admin listener and serve it on the current runtime.
///
/// Binding happens before returning so a bad address fails startup
/// instead of surfacing later inside the spawned task.
pub async fn spawn_admin_server(addr: &str) -> anyhow::Result<JoinHandle<()>> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("cannot bind admin server on {addr}: {e}"))?;
    let local = listener.local_addr()?;
    info!(addr = %local, "admin server listening");
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router()).await {
            error!(error = %e, "admin server stopped");
        }
    }))
}
