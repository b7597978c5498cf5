//! REST boundary for Bazaar.
//!
//! Every `/api/v1` route requires `Authorization: Bearer <token>`. Request
//! bodies are decoded into typed requests and validated before reaching the
//! cart and order services; every failure leaves as
//! `{"success": false, "error": <kind>, "message": <text>}`.

pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

use std::net::SocketAddr;
use tracing::info;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
