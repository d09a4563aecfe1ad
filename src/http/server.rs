//! HTTP server startup logic.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to resolve listen address: {0}")]
    Resolve(#[from] std::io::Error),

    #[error("Listen address {0} did not resolve to any socket address")]
    NoAddress(String),

    #[error("Server error: {0}")]
    Server(String),
}

/// Resolve `host:port`, accepting names such as `localhost`.
pub async fn resolve_addr(bind: &str) -> Result<SocketAddr, ServerError> {
    tokio::net::lookup_host(bind)
        .await?
        .next()
        .ok_or_else(|| ServerError::NoAddress(bind.to_string()))
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = resolve_addr(&config.http.bind_address()).await?;
    let handle = Handle::new();

    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.http.shutdown_grace_seconds),
    );

    serve(app, addr, handle).await
}

/// Serve `app` on `addr` until `handle` is shut down.
///
/// Binding port 0 is allowed; the bound address is then available from
/// [`Handle::listening`].
pub async fn serve(app: Router, addr: SocketAddr, handle: Handle) -> Result<(), ServerError> {
    tracing::info!(%addr, "Starting HTTP server");

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    tracing::info!("Server stopped");
    Ok(())
}
