//! Request handler module
//!
//! [`StaticRoute`] validates the method, resolves the path through the
//! try-files candidates and dispatches to a file response or a directory
//! listing.

pub mod files;
pub mod listing;
pub mod resolve;

use crate::config::RouteConfig;
use crate::error::ServeError;
use crate::http::{self, ResponseBody};
use hyper::service::Service;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Static file route over one root directory
///
/// Cloning is cheap; clones share the same configuration.
#[derive(Debug, Clone)]
pub struct StaticRoute {
    config: Arc<RouteConfig>,
}

impl StaticRoute {
    pub fn new(config: RouteConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Answer one request. Only the method, URI and headers are read.
    pub async fn handle<B>(&self, req: &Request<B>) -> Response<ResponseBody> {
        let logger = &self.config.logger;
        if !logger.is_off() {
            logger.write(&format!("{} {}", req.method(), req.uri()));
        }

        match self.serve(req).await {
            Ok(resp) => resp,
            Err(err) => {
                if !logger.is_off() {
                    logger.write(&err.to_string());
                }
                http::build_error_response(&err)
            }
        }
    }

    async fn serve<B>(&self, req: &Request<B>) -> Result<Response<ResponseBody>, ServeError> {
        if !matches!(*req.method(), Method::GET | Method::HEAD) {
            return Err(ServeError::NotImplemented(req.method().to_string()));
        }

        let candidates = resolve::resolve(req.uri().path(), &self.config)?;
        let entry = resolve::first_existing(&candidates, &self.config.logger).await?;

        if entry.metadata.is_dir() {
            if !self.config.autoindex {
                return Err(ServeError::Forbidden(entry.path.display().to_string()));
            }
            let wants_json = listing::query_has_json(req.uri().query());
            listing::list(req, &entry.path, wants_json).await
        } else {
            files::respond(req, &entry.path, &entry.metadata).await
        }
    }
}

impl<B> Service<Request<B>> for StaticRoute {
    type Response = Response<ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<B>) -> Self::Future {
        let route = self.clone();
        // The request body is never read
        let (parts, _body) = req.into_parts();
        let req = Request::from_parts(parts, ());
        Box::pin(async move { Ok(route.handle(&req).await) })
    }
}
