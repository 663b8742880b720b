// Configuration module entry point
// Route configuration for the handler and layered settings for the binary

mod route;
mod types;

use std::io;
use std::net::SocketAddr;

use crate::logger::LogSink;

// Re-export public types
pub use route::RouteConfig;
pub use types::{Config, LoggingConfig, RouteSettings, ServerConfig};

/// Environment variable prefix, e.g. `STATIC_ROUTE_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "STATIC_ROUTE";

impl Config {
    /// Load configuration from specified file path (extension optional)
    /// A missing file is not an error; defaults and environment still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("route.tryfiles")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("route.root", ".")?
            .set_default("route.autoindex", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.target", "off")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build the diagnostic sink named by the logging section
    pub fn log_sink(&self) -> io::Result<LogSink> {
        if let Some(ref path) = self.logging.file {
            return LogSink::file(path);
        }
        LogSink::from_name(&self.logging.target).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unknown log target: {}", self.logging.target),
            )
        })
    }

    /// Convert the route section into a handler configuration
    pub fn route_config(&self) -> io::Result<RouteConfig> {
        let mut route = RouteConfig::new(self.route.root.clone())
            .with_tryfiles(self.route.tryfiles.iter().cloned())
            .with_autoindex(self.route.autoindex)
            .with_logger(self.log_sink()?);
        if let Some(ref prefix) = self.route.strip_prefix {
            route = route.with_strip_prefix(prefix.clone());
        }
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    // Environment variables are process-wide; loads that read them must not overlap
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_without_file() {
        let _env = ENV_LOCK.lock().unwrap();
        let config = Config::load_from("/nonexistent/static-route-test-config").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.route.root, Path::new("."));
        assert!(config.route.tryfiles.is_empty());
        assert!(!config.route.autoindex);
        assert_eq!(config.logging.target, "off");
        assert_eq!(config.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_tryfiles_from_environment() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("STATIC_ROUTE_ROUTE__TRYFILES", "index.html,index.htm");
        std::env::set_var("STATIC_ROUTE_SERVER__PORT", "9300");
        let loaded = Config::load_from("/nonexistent/static-route-test-config");
        std::env::remove_var("STATIC_ROUTE_ROUTE__TRYFILES");
        std::env::remove_var("STATIC_ROUTE_SERVER__PORT");

        let config = loaded.unwrap();
        assert_eq!(config.route.tryfiles, ["index.html", "index.htm"]);
        assert_eq!(config.server.port, 9300);
    }

    #[test]
    fn test_load_toml_file() {
        let _env = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9128

[route]
root = "/srv/www"
tryfiles = ["index.html", "index.htm"]
autoindex = true
strip_prefix = "/static"

[logging]
target = "stderr"
"#,
        )
        .unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 9128);
        assert_eq!(config.server.host, "127.0.0.1");

        let route = config.route_config().unwrap();
        assert_eq!(route.root, Path::new("/srv/www"));
        assert_eq!(route.tryfiles, ["index.html", "index.htm"]);
        assert!(route.autoindex);
        assert_eq!(route.strip_prefix.as_deref(), Some("/static"));
        assert!(matches!(route.logger, LogSink::Stderr));
    }

    #[test]
    fn test_unknown_log_target() {
        let _env = ENV_LOCK.lock().unwrap();
        let mut config = Config::load_from("/nonexistent/static-route-test-config").unwrap();
        config.logging.target = "syslog".to_string();
        assert!(config.route_config().is_err());
    }
}
