//! Static file route for hyper servers
//!
//! Maps a request path to a file or directory under a configured root:
//! - try-files fallbacks with a traversal guard
//! - `ETag` / `Last-Modified`, conditional GET and single byte ranges
//! - optional HTML or JSON directory listings
//!
//! ```no_run
//! use static_route::{RouteConfig, StaticRoute};
//!
//! let route = StaticRoute::new(
//!     RouteConfig::new("/srv/www")
//!         .with_tryfiles(["index.html"])
//!         .with_autoindex(true),
//! );
//! // `route` implements `hyper::service::Service` and can be handed to
//! // `hyper::server::conn::http1::Builder::serve_connection`.
//! # drop(route);
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use config::RouteConfig;
pub use error::ServeError;
pub use handler::StaticRoute;
pub use http::ResponseBody;
pub use logger::LogSink;
