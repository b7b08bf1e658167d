// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub livereload: LiveReloadConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (common, combined, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    /// Seconds allowed for a request head, idle keep-alive gaps included
    pub read_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// Live reload configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LiveReloadConfig {
    /// Serving and scan root. Falls back to the executable's directory.
    #[serde(default)]
    pub root: Option<String>,
    /// Path answered with the latest-change timestamp
    #[serde(default = "default_check_path")]
    pub check_path: String,
    /// File suffixes whose changes trigger a reload
    #[serde(default = "default_watch_extensions")]
    pub watch_extensions: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_check_path() -> String {
    "/livereload-check".to_string()
}

fn default_watch_extensions() -> Vec<String> {
    [".html", ".css", ".js"].iter().map(ToString::to_string).collect()
}

impl Default for LiveReloadConfig {
    fn default() -> Self {
        Self {
            root: None,
            check_path: default_check_path(),
            watch_extensions: default_watch_extensions(),
        }
    }
}
