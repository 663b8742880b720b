//! HTTP Range request parsing module
//!
//! Single `bytes=start-end` ranges only. Each half is read as a leading
//! integer; a half that is missing, unparsable or zero falls back to its
//! default (`0` for start, `size - 1` for end). A zero start is therefore
//! indistinguishable from an absent one, and `bytes=0-0` means the whole file.

/// A satisfiable byte window of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// First byte, inclusive
    pub start: u64,
    /// Last byte, inclusive, always `< total`
    pub end: u64,
    /// Full size of the file
    pub total: u64,
}

impl RangeSpec {
    /// Number of bytes in the window
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value, e.g. `bytes 0-4/10`
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Valid range request
    Valid(RangeSpec),
    /// `end <= start` after defaulting - should return 416
    NotSatisfiable,
    /// No Range header, serve the full content
    None,
}

/// Parse an HTTP Range header against a file of `file_size` bytes
///
/// # Examples
/// ```
/// use static_route::http::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-4"), 10);
/// assert!(matches!(result, RangeParseResult::Valid(r) if r.len() == 5));
///
/// let result = parse_range_header(Some("bytes=5-2"), 10);
/// assert_eq!(result, RangeParseResult::NotSatisfiable);
///
/// assert_eq!(parse_range_header(None, 10), RangeParseResult::None);
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: u64) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let spec = header.replacen("bytes=", "", 1);
    let mut parts = spec.split('-');
    let start_str = parts.next();
    let end_str = parts.next();

    // An empty file has no last byte to default to
    let Some(last) = file_size.checked_sub(1) else {
        return RangeParseResult::NotSatisfiable;
    };

    let start = start_str
        .and_then(leading_integer)
        .filter(|&v| v != 0)
        .unwrap_or(0);
    let end = end_str
        .and_then(leading_integer)
        .filter(|&v| v != 0)
        .unwrap_or(last)
        .min(last);

    if end <= start {
        return RangeParseResult::NotSatisfiable;
    }

    RangeParseResult::Valid(RangeSpec {
        start,
        end,
        total: file_size,
    })
}

/// Read the leading decimal integer of `s`, ignoring leading whitespace
/// and an optional `+`. Trailing garbage is ignored; overflow saturates.
fn leading_integer(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: &str = &s[..s.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    Some(digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    }))
}
