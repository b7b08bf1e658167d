//! HTTP protocol layer module
//!
//! Protocol helpers shared by the reload-check route and static file serving:
//! validators, MIME detection, byte ranges and response builders.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{resolve_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_options_response, build_redirect_response, build_text_response, HttpResponse,
};
