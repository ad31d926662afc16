//! Liveness endpoint for the event-source connection.
//!
//! A single externally polled `GET /health` reporting whether the Socket
//! Mode connection is currently alive: `200 OK` when up, `503` when down,
//! no payload semantics beyond the status code.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{AppError, Result};

/// Shared flag tracking whether the event-source connection is live.
///
/// Flipped up by Socket Mode hello events and down when the listener exits.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus(Arc<AtomicBool>);

impl ConnectionStatus {
    /// Record the connection as up or down.
    pub fn set_connected(&self, up: bool) {
        self.0.store(up, Ordering::SeqCst);
    }

    /// Whether the connection is currently live.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

async fn health(State(status): State<ConnectionStatus>) -> (StatusCode, &'static str) {
    if status.is_connected() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "down")
    }
}

/// Build the health router; exposed separately so tests can mount it on an
/// ephemeral listener.
#[must_use]
pub fn router(status: ConnectionStatus) -> Router {
    Router::new().route("/health", get(health)).with_state(status)
}

/// Serve `GET /health` on `port` until cancelled.
///
/// # Errors
///
/// Returns `AppError::Config` if the port cannot be bound and `AppError::Io`
/// if the server fails while running.
pub async fn serve_health(port: u16, status: ConnectionStatus, ct: CancellationToken) -> Result<()> {
    let bind = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Config(format!("failed to bind health endpoint: {err}")))?;
    info!(%bind, "health endpoint listening");

    axum::serve(listener, router(status))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Io(err.to_string()))
}
