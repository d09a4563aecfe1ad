//! HTTP server module.
//!
//! Binds the configured address with `axum_server`, serves the router over plain
//! HTTP, and drains connections gracefully on SIGTERM/SIGINT.

mod server;
mod shutdown;

pub use server::{resolve_addr, serve, start_server, ServerError};
pub use shutdown::{setup_shutdown_handler, shutdown_signal, ShutdownSignal};
