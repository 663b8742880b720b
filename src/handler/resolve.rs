//! Request path resolution
//!
//! Turns a raw URL path into the ordered filesystem candidates for one
//! request, then stats them in order until one exists.

use crate::config::RouteConfig;
use crate::error::ServeError;
use crate::logger::LogSink;
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Ordered filesystem paths to try for one request; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    paths: Vec<PathBuf>,
}

impl CandidateList {
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// The literal request path, tried last
    #[cfg(test)]
    pub fn literal(&self) -> &Path {
        // `resolve` always pushes the empty suffix last
        self.paths.last().map_or_else(|| Path::new(""), PathBuf::as_path)
    }
}

/// First candidate that exists on disk
#[derive(Debug)]
pub struct ResolvedEntry {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// Build the candidate list for `request_path`
///
/// The path is percent-decoded, normalized so no `..` can climb above the
/// root, stripped of the configured prefix and joined with each suffix.
pub fn resolve(request_path: &str, config: &RouteConfig) -> Result<CandidateList, ServeError> {
    let decoded = decode_path(request_path)?;
    let mut normalized = normalize(&decoded);

    if let Some(ref prefix) = config.strip_prefix {
        if let Some(rest) = normalized.strip_prefix(prefix.as_str()) {
            normalized = normalize(rest);
        }
    }

    let mut base = config.root.clone();
    base.extend(normalized.split('/').filter(|s| !s.is_empty()));

    // `/file.txt/` must not stat as the file itself
    let literal = if decoded.ends_with('/') && normalized != "/" {
        base.join("")
    } else {
        base.clone()
    };

    let paths = config
        .candidate_suffixes()
        .map(|suffix| {
            let suffix = suffix.trim_start_matches('/');
            if suffix.is_empty() {
                literal.clone()
            } else {
                base.join(suffix)
            }
        })
        .collect();

    Ok(CandidateList { paths })
}

/// Stat candidates strictly in order; the first success wins
///
/// Each failure is logged and the next candidate tried. Once the list is
/// exhausted the last failure decides between 404 and 500.
pub async fn first_existing(
    candidates: &CandidateList,
    logger: &LogSink,
) -> Result<ResolvedEntry, ServeError> {
    let mut last_err = None;

    for path in candidates.paths() {
        match fs::metadata(path).await {
            Ok(metadata) => {
                return Ok(ResolvedEntry {
                    path: path.clone(),
                    metadata,
                })
            }
            Err(e) => {
                logger.write(&format!("stat {}: {e}", path.display()));
                last_err = Some(e);
            }
        }
    }

    Err(ServeError::from_io(
        last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)),
    ))
}

/// Strict percent-decoding: every `%` must start a two-digit hex escape and
/// the decoded bytes must be UTF-8
pub fn decode_path(raw: &str) -> Result<String, ServeError> {
    let bytes = raw.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                return Err(ServeError::BadRequest(format!(
                    "malformed escape in {raw:?}"
                )));
            }
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| ServeError::BadRequest(format!("{raw:?}: {e}")))
}

/// Collapse empty, `.` and `..` segments into an absolute `/a/b` path
///
/// A `..` at the top is dropped, so the result never points above `/`.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RouteConfig {
        RouteConfig::new("/srv/www")
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/a%20b/c.txt").unwrap(), "/a b/c.txt");
        assert_eq!(decode_path("/%E2%9C%93").unwrap(), "/\u{2713}");
        assert_eq!(decode_path("/plain").unwrap(), "/plain");
    }

    #[test]
    fn test_decode_rejects_malformed_escapes() {
        for raw in ["/%", "/%2", "/%zz", "/a%g1", "/%FF"] {
            assert!(
                matches!(decode_path(raw), Err(ServeError::BadRequest(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/a/./b//c/"), "/a/b/c");
        assert_eq!(normalize("/a/b/../c"), "/a/c");
        assert_eq!(normalize("/../../etc/passwd"), "/etc/passwd");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/.."), "/");
    }

    #[test]
    fn test_traversal_stays_under_root() {
        for raw in [
            "/../../etc/passwd",
            "/a/../../../etc/passwd",
            "/%2e%2e/%2e%2e/etc/passwd",
            "/..%2f..%2fetc/passwd",
        ] {
            let list = resolve(raw, &config()).unwrap();
            for path in list.paths() {
                assert!(path.starts_with("/srv/www"), "{raw} -> {}", path.display());
            }
            assert_eq!(list.literal(), Path::new("/srv/www/etc/passwd"));
        }
    }

    #[test]
    fn test_candidates_in_order() {
        let config = config().with_tryfiles(["index.html", "/index.htm"]);
        let list = resolve("/images/", &config).unwrap();
        assert_eq!(
            list.paths(),
            [
                PathBuf::from("/srv/www/images/index.html"),
                PathBuf::from("/srv/www/images/index.htm"),
                PathBuf::from("/srv/www/images"),
            ]
        );
    }

    #[test]
    fn test_trailing_slash_kept_on_literal() {
        let list = resolve("/readme.txt/", &config()).unwrap();
        assert_eq!(list.literal().as_os_str(), "/srv/www/readme.txt/");

        let list = resolve("/readme.txt", &config()).unwrap();
        assert_eq!(list.literal().as_os_str(), "/srv/www/readme.txt");

        let list = resolve("/", &config()).unwrap();
        assert_eq!(list.literal().as_os_str(), "/srv/www");
    }

    #[tokio::test]
    async fn test_trailing_slash_on_file_fails_stat() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"0123456789").unwrap();
        let config = RouteConfig::new(dir.path());

        let list = resolve("/readme.txt/", &config).unwrap();
        let err = first_existing(&list, &LogSink::Off).await.unwrap_err();
        assert!(matches!(err, ServeError::Internal(_)));
    }

    #[test]
    fn test_root_request() {
        let list = resolve("/", &config()).unwrap();
        assert_eq!(list.paths(), [PathBuf::from("/srv/www")]);
    }

    #[test]
    fn test_strip_prefix() {
        let config = config().with_strip_prefix("/static");
        let list = resolve("/static/css/site.css", &config).unwrap();
        assert_eq!(list.literal(), Path::new("/srv/www/css/site.css"));

        // Prefix is matched after normalization
        let list = resolve("/x/../static/app.js", &config).unwrap();
        assert_eq!(list.literal(), Path::new("/srv/www/app.js"));

        // Non-matching paths are left alone
        let list = resolve("/other/app.js", &config).unwrap();
        assert_eq!(list.literal(), Path::new("/srv/www/other/app.js"));
    }

    #[tokio::test]
    async fn test_first_existing_falls_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.htm"), b"htm").unwrap();

        let config = RouteConfig::new(dir.path()).with_tryfiles(["index.html", "index.htm"]);
        let list = resolve("/docs", &config).unwrap();
        let entry = first_existing(&list, &LogSink::Off).await.unwrap();

        assert_eq!(entry.path, dir.path().join("docs/index.htm"));
        assert!(entry.metadata.is_file());
    }

    #[tokio::test]
    async fn test_first_existing_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = RouteConfig::new(dir.path()).with_tryfiles(["index.html"]);
        let list = resolve("/missing", &config).unwrap();

        let err = first_existing(&list, &LogSink::Off).await.unwrap_err();
        assert!(matches!(err, ServeError::NotFound(_)));
    }
}
