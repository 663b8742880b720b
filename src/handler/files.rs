//! File responses
//!
//! Validators, conditional GET, byte ranges and the streamed body for a
//! resolved regular file.

use crate::error::ServeError;
use crate::http::{self, cache, mime, RangeParseResult, ResponseBody};
use hyper::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, IF_NONE_MATCH,
    LAST_MODIFIED, RANGE,
};
use hyper::{Method, Request, Response, StatusCode};
use std::fs::Metadata;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Build the response for a regular file
///
/// Order matters: a matching `If-None-Match` wins over `Range`, and only
/// then is the range looked at.
pub async fn respond<B>(
    req: &Request<B>,
    path: &Path,
    metadata: &Metadata,
) -> Result<Response<ResponseBody>, ServeError> {
    let size = metadata.len();
    let modified = metadata.modified().map_err(ServeError::Internal)?;
    let etag = cache::generate_etag(size, modified);

    let builder = Response::builder()
        .header(LAST_MODIFIED, cache::http_date(modified))
        .header(CONTENT_TYPE, mime::content_type_for(path))
        .header(ETAG, &etag);

    if cache::check_etag_match(header_str(req, IF_NONE_MATCH.as_str()), &etag) {
        return Ok(builder
            .status(StatusCode::NOT_MODIFIED)
            .body(http::empty_body())?);
    }

    let is_head = req.method() == Method::HEAD;
    // Any Range header counts, even one that is not visible ASCII
    let range_header = req
        .headers()
        .get(RANGE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()));

    match http::parse_range_header(range_header.as_deref(), size) {
        RangeParseResult::NotSatisfiable => Err(ServeError::RangeNotSatisfiable {
            range: range_header.unwrap_or_default().into_owned(),
            size,
            headers: builder.headers_ref().cloned().unwrap_or_default(),
        }),
        RangeParseResult::Valid(range) => {
            let body = if is_head {
                http::empty_body()
            } else {
                open_window(path, range.start, range.len()).await?
            };
            Ok(builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(CONTENT_RANGE, range.content_range())
                .header(ACCEPT_RANGES, "bytes")
                .header(CONTENT_LENGTH, range.len())
                .body(body)?)
        }
        RangeParseResult::None => {
            let body = if is_head {
                http::empty_body()
            } else {
                open_window(path, 0, size).await?
            };
            Ok(builder
                .status(StatusCode::OK)
                .header(CONTENT_LENGTH, size)
                .body(body)?)
        }
    }
}

/// Open `path` and stream `len` bytes starting at `start`
///
/// Failures here happen before any byte is sent, so they still become a
/// status code. Later read errors abort the body instead.
async fn open_window(path: &Path, start: u64, len: u64) -> Result<ResponseBody, ServeError> {
    let mut file = File::open(path).await.map_err(ServeError::from_io)?;
    if start > 0 {
        file.seek(SeekFrom::Start(start))
            .await
            .map_err(ServeError::from_io)?;
    }
    Ok(http::stream_body(file.take(len)))
}

fn header_str<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn fixture(contents: &[u8]) -> (tempfile::TempDir, std::path::PathBuf, Metadata) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, contents).unwrap();
        let metadata = tokio::fs::metadata(&path).await.unwrap();
        (dir, path, metadata)
    }

    fn request(method: Method, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().method(method).uri("/readme.txt");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    async fn body_bytes(resp: Response<ResponseBody>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn test_full_response_headers() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        let resp = respond(&request(Method::GET, &[]), &path, &metadata)
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "10");
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
        let etag = cache::generate_etag(10, metadata.modified().unwrap());
        assert_eq!(resp.headers()[ETAG], etag.as_str());
        assert!(resp.headers().contains_key(LAST_MODIFIED));
        assert!(!resp.headers().contains_key(ACCEPT_RANGES));
        assert_eq!(body_bytes(resp).await, b"0123456789");
    }

    #[tokio::test]
    async fn test_partial_window() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        let req = request(Method::GET, &[("range", "bytes=3-6")]);
        let resp = respond(&req, &path, &metadata).await.unwrap();

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 3-6/10");
        assert_eq!(resp.headers()[ACCEPT_RANGES], "bytes");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert_eq!(body_bytes(resp).await, b"3456");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;

        let resp = respond(&request(Method::HEAD, &[]), &path, &metadata)
            .await
            .unwrap();
        assert_eq!(resp.headers()[CONTENT_LENGTH], "10");
        assert!(body_bytes(resp).await.is_empty());

        let req = request(Method::HEAD, &[("range", "bytes=2-5")]);
        let resp = respond(&req, &path, &metadata).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "4");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_etag_match_beats_range() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        let etag = cache::generate_etag(10, metadata.modified().unwrap());
        let req = request(
            Method::GET,
            &[("if-none-match", etag.as_str()), ("range", "bytes=0-4")],
        );
        let resp = respond(&req, &path, &metadata).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert!(!resp.headers().contains_key(CONTENT_RANGE));
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        let req = request(Method::GET, &[("range", "bytes=6-2")]);
        let err = respond(&req, &path, &metadata).await.unwrap_err();

        let ServeError::RangeNotSatisfiable { size, headers, .. } = err else {
            panic!("expected a 416 error");
        };
        assert_eq!(size, 10);
        let etag = cache::generate_etag(10, metadata.modified().unwrap());
        assert_eq!(headers[ETAG], etag.as_str());
        assert!(headers.contains_key(LAST_MODIFIED));
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[tokio::test]
    async fn test_non_ascii_range_defaults_to_whole_window() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        let mut req = request(Method::GET, &[]);
        req.headers_mut().insert(
            RANGE,
            hyper::header::HeaderValue::from_bytes(b"bytes=\xe9-").unwrap(),
        );
        let resp = respond(&req, &path, &metadata).await.unwrap();

        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 0-9/10");
        assert_eq!(body_bytes(resp).await, b"0123456789");
    }

    #[tokio::test]
    async fn test_file_removed_after_stat_is_not_found() {
        let (_dir, path, metadata) = fixture(b"0123456789").await;
        std::fs::remove_file(&path).unwrap();
        let err = respond(&request(Method::GET, &[]), &path, &metadata)
            .await
            .unwrap_err();
        assert!(matches!(err, ServeError::NotFound(_)));
    }
}
