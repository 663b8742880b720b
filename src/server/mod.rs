// Server module entry point
// Minimal host for running a static route on its own: listener plus
// per-connection hyper service

pub mod connection;
pub mod listener;

pub use connection::{accept_connection, ServerState};
pub use listener::create_listener;

use std::sync::Arc;
use tokio::net::TcpListener;

use crate::logger;

/// Accept connections until Ctrl-C
///
/// Connections are served on `spawn_local` tasks, so this must run inside a
/// `tokio::task::LocalSet`.
pub async fn run(listener: TcpListener, state: Arc<ServerState>) -> std::io::Result<()> {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                return Ok(());
            }
        }
    }
}
