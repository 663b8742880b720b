use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use static_route::config::Config;
use static_route::server::{self, ServerState};
use static_route::{logger, StaticRoute};

/// Serve a directory over HTTP with try-files, ETag and range support
#[derive(Debug, Parser)]
#[command(name = "static-route", version, about)]
struct Cli {
    /// Directory to serve (defaults to the configured root, then ".")
    root: Option<PathBuf>,

    /// Config file, extension optional; missing files are ignored
    #[arg(short, long, default_value = "static-route")]
    config: String,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// Render directory listings instead of answering 403
    #[arg(short = 'i', long)]
    autoindex: bool,

    /// Suffix tried before the literal path, repeatable (e.g. -t index.html)
    #[arg(short = 't', long = "tryfile")]
    tryfiles: Vec<String>,

    /// Path prefix removed before resolving
    #[arg(long)]
    strip_prefix: Option<String>,

    /// Handler diagnostics: off, stdout, stderr or tracing
    #[arg(long)]
    log: Option<String>,

    /// Append handler diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// CLI flags take precedence over file and environment settings
    fn apply(self, cfg: &mut Config) {
        if let Some(root) = self.root {
            cfg.route.root = root;
        }
        if let Some(host) = self.host {
            cfg.server.host = host;
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if self.autoindex {
            cfg.route.autoindex = true;
        }
        if !self.tryfiles.is_empty() {
            cfg.route.tryfiles = self.tryfiles;
        }
        if self.strip_prefix.is_some() {
            cfg.route.strip_prefix = self.strip_prefix;
        }
        if let Some(target) = self.log {
            cfg.logging.target = target;
        }
        if self.log_file.is_some() {
            cfg.logging.file = self.log_file;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut cfg = Config::load_from(&cli.config)?;
    cli.apply(&mut cfg);

    // The handler never looks at the working directory; pin the root here
    cfg.route.root = std::fs::canonicalize(&cfg.route.root)?;

    logger::init(&cfg);

    // Single-threaded cooperative scheduling: every connection is a local task
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(ServerState {
        route: StaticRoute::new(cfg.route_config()?),
        access_log: cfg.logging.access_log,
        access_log_format: cfg.logging.access_log_format.clone(),
    });

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state)).await?;
    Ok(())
}
