//! Logger module
//!
//! Two layers:
//! - [`LogSink`]: the per-handler diagnostic sink (request lines, stat and
//!   classification failures). Off unless configured.
//! - Server lifecycle and access logging for the bundled binary, emitted
//!   through `tracing`.

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::LogSink;

use crate::config::Config;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` wins over the configured level. Should be called once at startup.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Static route server listening on: http://{addr}");
    tracing::info!("Root: {}", config.route.root.display());
    tracing::info!(
        "Autoindex: {}, try-files: {:?}, strip prefix: {:?}",
        config.route.autoindex,
        config.route.tryfiles,
        config.route.strip_prefix
    );
    tracing::info!("Diagnostics: {}", config.logging.target);
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
