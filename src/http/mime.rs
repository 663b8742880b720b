//! MIME type detection module
//!
//! Returns the Content-Type for a file path based on its extension.

use std::path::Path;

/// Get MIME Content-Type for a file path
///
/// Unknown or missing extensions map to `application/octet-stream`.
///
/// # Examples
/// ```
/// use static_route::http::mime::content_type_for;
/// use std::path::Path;
/// assert_eq!(content_type_for(Path::new("index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
/// assert_eq!(content_type_for(Path::new("LICENSE")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(content_type_for(Path::new("a.html")), "text/html");
        assert_eq!(content_type_for(Path::new("a.css")), "text/css");
        assert_eq!(content_type_for(Path::new("a.json")), "application/json");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("/srv/www/readme.txt")), "text/plain");
    }

    #[test]
    fn test_case_insensitive_extension() {
        assert_eq!(content_type_for(Path::new("PHOTO.JPG")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(
            content_type_for(Path::new("a.xyzzy")),
            "application/octet-stream"
        );
        assert_eq!(content_type_for(Path::new("Makefile")), "application/octet-stream");
    }
}
