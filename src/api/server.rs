//! API server lifecycle: bind on loopback, serve the router, shut down
//! gracefully on ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::router::api_router;
use crate::state::AppState;

/// Serve the API on `127.0.0.1:<port>` until interrupted.
pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, api_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received");
    }
}
