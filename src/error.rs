//! Error taxonomy for request handling
//!
//! Every failure is classified where it happens and mapped straight to a
//! status code. Error responses never carry the error detail.

use hyper::{HeaderMap, StatusCode};
use std::io;
use thiserror::Error;

/// Why a request could not be served normally
#[derive(Debug, Error)]
pub enum ServeError {
    /// Malformed percent-encoding in the request path
    #[error("bad request path: {0}")]
    BadRequest(String),

    /// Method outside GET/HEAD
    #[error("method not implemented: {0}")]
    NotImplemented(String),

    /// Every candidate path was missing
    #[error("not found: {0}")]
    NotFound(io::Error),

    /// Directory requested while autoindex is off
    #[error("directory listing forbidden: {0}")]
    Forbidden(String),

    /// Range with `end <= start` after defaulting; `headers` are the file's
    /// validators, still sent with the 416
    #[error("range not satisfiable: {range} (size {size})")]
    RangeNotSatisfiable {
        range: String,
        size: u64,
        headers: HeaderMap,
    },

    /// Any other filesystem failure (permissions, I/O faults)
    #[error("internal error: {0}")]
    Internal(io::Error),
}

impl ServeError {
    /// Classify a filesystem error: missing entries are 404, the rest 500
    pub fn from_io(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound(err)
        } else {
            Self::Internal(err)
        }
    }

    /// Status code sent to the client for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::RangeNotSatisfiable { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<hyper::http::Error> for ServeError {
    fn from(err: hyper::http::Error) -> Self {
        Self::Internal(io::Error::other(err))
    }
}
