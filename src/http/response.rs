//! HTTP response building module
//!
//! Body constructors and builders for bodiless status responses.

use crate::error::ServeError;
use futures_util::stream::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::header::CONTENT_RANGE;
use hyper::{HeaderMap, Response, StatusCode};
use std::io;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

/// Body type of every response produced by the handler
pub type ResponseBody = BoxBody<Bytes, io::Error>;

/// Empty body
pub fn empty_body() -> ResponseBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// In-memory body
pub fn full_body(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

/// Streaming body pulled from `reader` only as fast as the connection drains.
/// Dropping the body drops the reader.
pub fn stream_body<R>(reader: R) -> ResponseBody
where
    R: AsyncRead + Send + Sync + 'static,
{
    let frames = ReaderStream::new(reader).map_ok(Frame::data);
    BodyExt::boxed(StreamBody::new(frames))
}

/// Build a response with only a status line
pub fn build_status_response(status: StatusCode) -> Response<ResponseBody> {
    let mut resp = Response::new(empty_body());
    *resp.status_mut() = status;
    resp
}

/// Build the bodiless response for a classified error
pub fn build_error_response(err: &ServeError) -> Response<ResponseBody> {
    match err {
        ServeError::RangeNotSatisfiable { size, headers, .. } => {
            build_416_response(*size, headers)
        }
        _ => build_status_response(err.status()),
    }
}

/// Build 416 Range Not Satisfiable response carrying `headers` as well
pub fn build_416_response(file_size: u64, headers: &HeaderMap) -> Response<ResponseBody> {
    let mut builder = Response::builder().status(StatusCode::RANGE_NOT_SATISFIABLE);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers.clone());
    }
    builder
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(empty_body())
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            build_status_response(StatusCode::RANGE_NOT_SATISFIABLE)
        })
}

/// Log response build error
pub(crate) fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
