// Configuration types module
// Serde-facing settings for the bundled server binary

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub route: RouteSettings,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Static route settings, converted into a `RouteConfig` at startup
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteSettings {
    pub root: PathBuf,
    /// Suffixes tried in order before the literal path
    #[serde(default)]
    pub tryfiles: Vec<String>,
    #[serde(default)]
    pub autoindex: bool,
    #[serde(default)]
    pub strip_prefix: Option<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Handler diagnostics target: off, stdout, stderr or tracing
    pub target: String,
    /// Handler diagnostics file; overrides `target` when set
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}
