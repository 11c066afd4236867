//! HTTP inbound adapters: the webhook receiver and the dashboard.

pub mod dashboard;
pub mod problem;
pub mod render;
pub mod webhook;

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use crate::error::{Error, Result};
use crate::infrastructure::supervisor::shutdown_requested;

/// Bind `addr` and serve `router` until `shutdown` flips to `true`.
///
/// In-flight requests are drained before this returns.
///
/// # Errors
///
/// Returns [`Error::Server`] if the address cannot be bound or the server
/// fails while running.
pub async fn serve(
    name: &'static str,
    addr: SocketAddr,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("{name}: failed to bind {addr}: {e}")))?;
    info!(service = name, %addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown_requested(&mut shutdown).await })
        .await
        .map_err(|e| Error::Server(format!("{name}: {e}")))?;

    info!(service = name, "Stopped accepting connections");
    Ok(())
}
