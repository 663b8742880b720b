//! Directory listings (autoindex)
//!
//! Entries are stat'ed concurrently, sorted directories-first and rendered
//! as HTML or, with `?json`, as a JSON array of names.

use crate::error::ServeError;
use crate::http::{self, ResponseBody};
use futures_util::future::join_all;
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::cmp::Ordering;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Synthetic parent entry prepended to every listing
pub const PARENT: &str = "..";

/// Bytes escaped when a name becomes one URL path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirectoryEntry {
    /// Name as shown to clients: directories get a trailing `/`, except the
    /// synthetic `..`
    pub fn display_name(&self) -> String {
        if self.is_dir && self.name != PARENT {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Whether the query string carries a `json` key, with or without a value
pub fn query_has_json(query: Option<&str>) -> bool {
    query.is_some_and(|q| {
        q.split('&').any(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            percent_decode_str(key).decode_utf8_lossy() == "json"
        })
    })
}

/// Render the listing for `dir`
pub async fn list<B>(
    req: &Request<B>,
    dir: &Path,
    wants_json: bool,
) -> Result<Response<ResponseBody>, ServeError> {
    let mut entries = read_entries(dir).await.map_err(ServeError::Internal)?;
    sort_entries(&mut entries);

    let (content_type, body) = if wants_json {
        ("application/json; charset=utf-8", render_json(&entries)?)
    } else {
        (
            "text/html; charset=utf-8",
            render_html(req.uri().path(), &entries).into_bytes(),
        )
    };

    let content_length = body.len();
    let body = if req.method() == Method::HEAD {
        http::empty_body()
    } else {
        http::full_body(body)
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(body)?)
}

/// Enumerate `dir` plus `..` and stat every entry concurrently
///
/// Only a failing enumeration is an error; entries whose stat fails are
/// left out of the result. Output order is unspecified.
pub async fn read_entries(dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut targets: Vec<(String, PathBuf)> = vec![(PARENT.to_string(), dir.join(PARENT))];

    let mut read_dir = fs::read_dir(dir).await?;
    while let Some(entry) = read_dir.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        targets.push((name, entry.path()));
    }

    let stats = join_all(targets.into_iter().map(|(name, path)| async move {
        fs::metadata(&path).await.map(|meta| DirectoryEntry {
            name,
            is_dir: meta.is_dir(),
        })
    }))
    .await;

    Ok(stats.into_iter().filter_map(Result::ok).collect())
}

/// Directories first, then case-insensitive by name, ties by plain order
pub fn sort_entries(entries: &mut [DirectoryEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
    b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

/// JSON array of display names
pub fn render_json(entries: &[DirectoryEntry]) -> Result<Vec<u8>, ServeError> {
    let names: Vec<String> = entries.iter().map(DirectoryEntry::display_name).collect();
    serde_json::to_vec(&names).map_err(|e| ServeError::Internal(e.into()))
}

/// HTML index page for the request path `base`
pub fn render_html(base: &str, entries: &[DirectoryEntry]) -> String {
    let title = html_escape::encode_text(&format!("Index of {base}")).into_owned();

    let mut html = String::new();
    html.push_str("<!doctype html><html><head><title>\n");
    html.push_str(&title);
    html.push_str("\n</title></head><body>\n");
    let _ = write!(html, "<h1>{title}</h1>");
    html.push_str("<hr />\n");
    html.push_str("<ul style=\"list-style: none; font-family: monospace;\">\n");
    for entry in entries {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\">{}</a></li>",
            html_escape::encode_double_quoted_attribute(&link_href(base, entry)),
            html_escape::encode_text(&entry.display_name()),
        );
    }
    html.push_str("</ul>\n");
    html.push_str("<hr />\n");
    html.push_str("</body></html>\n");
    html
}

/// Absolute href for `entry` listed under the request path `base`
fn link_href(base: &str, entry: &DirectoryEntry) -> String {
    let encoded = utf8_percent_encode(&entry.name, SEGMENT).to_string();

    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    if entry.name == PARENT {
        segments.pop();
    } else {
        segments.push(&encoded);
    }

    let mut href = format!("/{}", segments.join("/"));
    if entry.is_dir && !href.ends_with('/') {
        href.push('/');
    }
    href
}
