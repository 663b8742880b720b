//! HTTP cache control module
//!
//! Provides `ETag` generation from file metadata, `Last-Modified` dates and
//! conditional request handling.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generate an `ETag` from a file's size and modification time
///
/// # Returns
/// Quoted `ETag` string, e.g. `"120-1700000000000"`
pub fn generate_etag(size: u64, modified: SystemTime) -> String {
    format!("\"{size}-{}\"", mtime_millis(modified))
}

/// Milliseconds since the Unix epoch, negative for earlier times
fn mtime_millis(modified: SystemTime) -> i128 {
    match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => i128::try_from(d.as_millis()).unwrap_or(i128::MAX),
        Err(e) => -i128::try_from(e.duration().as_millis()).unwrap_or(i128::MAX),
    }
}

/// Format a timestamp as an HTTP date (IMF-fixdate)
///
/// ```
/// use static_route::http::cache::http_date;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
/// assert_eq!(http_date(t), "Sun, 06 Nov 1994 08:49:37 GMT");
/// ```
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Exact string comparison only: no lists, no `*`, no weak validators.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| client_etag == etag)
}
