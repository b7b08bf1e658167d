//! Request handler module
//!
//! Routes each request either to the reload-check endpoint or to static
//! file serving rooted at the watched directory.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, Route};
