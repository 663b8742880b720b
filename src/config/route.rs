//! Per-handler route configuration

use crate::logger::LogSink;
use std::path::PathBuf;

/// Immutable configuration of one static route, shared by all requests
///
/// ```
/// use static_route::RouteConfig;
///
/// let config = RouteConfig::new("/srv/www")
///     .with_tryfiles(["index.html"])
///     .with_autoindex(true);
/// assert_eq!(config.candidate_suffixes().collect::<Vec<_>>(), ["index.html", ""]);
/// ```
#[derive(Debug, Clone)]
pub struct RouteConfig {
    /// Directory every request path is resolved under
    pub root: PathBuf,
    /// Suffixes appended to the request path, tried in order
    pub tryfiles: Vec<String>,
    /// Render listings for directories instead of answering 403
    pub autoindex: bool,
    /// Leading path segment removed before resolution
    pub strip_prefix: Option<String>,
    /// Diagnostic sink
    pub logger: LogSink,
}

impl RouteConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tryfiles: Vec::new(),
            autoindex: false,
            strip_prefix: None,
            logger: LogSink::Off,
        }
    }

    #[must_use]
    pub fn with_tryfiles<I, S>(mut self, tryfiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tryfiles = tryfiles.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_autoindex(mut self, autoindex: bool) -> Self {
        self.autoindex = autoindex;
        self
    }

    #[must_use]
    pub fn with_strip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: LogSink) -> Self {
        self.logger = logger;
        self
    }

    /// Configured suffixes in order, then the empty suffix
    pub fn candidate_suffixes(&self) -> impl Iterator<Item = &str> {
        self.tryfiles
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(""))
    }
}
