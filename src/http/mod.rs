//! HTTP protocol layer module
//!
//! Range parsing, cache validators, content types and response builders,
//! decoupled from filesystem resolution.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult, RangeSpec};
pub use response::{
    build_416_response, build_error_response, build_status_response, empty_body, full_body,
    stream_body, ResponseBody,
};
