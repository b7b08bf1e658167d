//! Live-reload development server
//!
//! Serves a directory tree over HTTP and answers `/livereload-check` with the
//! newest modification time among watched files (`.html`, `.css`, `.js` by
//! default), so a polling page script can reload itself after edits.

pub mod config;
pub mod handler;
pub mod http;
pub mod livereload;
pub mod logger;
pub mod server;
