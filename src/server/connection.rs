// Connection handling module
// Serves a single TCP connection with the static route

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderName, CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Version};
use hyper_util::rt::TokioIo;

use crate::handler::StaticRoute;
use crate::logger::{self, AccessLogEntry};

/// Shared, read-only state of the bundled server
#[derive(Debug)]
pub struct ServerState {
    pub route: StaticRoute,
    pub access_log: bool,
    pub access_log_format: String,
}

/// Serve one accepted connection in a spawned local task.
///
/// Keep-alive is enabled. Dropping a connection drops any in-flight
/// response body, closing the file being streamed.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared server state
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    let state = Arc::clone(state);
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(serve_logged(&state, &req, peer_addr).await) }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }
    });
}

async fn serve_logged<B>(
    state: &ServerState,
    req: &Request<B>,
    peer_addr: SocketAddr,
) -> hyper::Response<crate::ResponseBody> {
    let started = Instant::now();
    let resp = state.route.handle(req).await;

    if state.access_log {
        let entry = access_entry(req, &resp, peer_addr, started);
        logger::log_access(&entry, &state.access_log_format);
    }
    resp
}

fn access_entry<B, R>(
    req: &Request<B>,
    resp: &hyper::Response<R>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().to_string(),
    );
    entry.http_version = version_str(req.version()).to_string();
    entry.status = resp.status().as_u16();
    entry.content_length = resp
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
