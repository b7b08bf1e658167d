// Configuration module entry point
// Loads layered configuration and exposes the shared runtime state

mod state;
mod types;

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LiveReloadConfig, LoggingConfig, PerformanceConfig, ServerConfig,
};

/// Default configuration file (looked up without extension)
pub const DEFAULT_CONFIG_PATH: &str = "devserver";

impl Config {
    /// Load configuration from the default file name
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (extension optional)
    ///
    /// Sources, lowest priority first: built-in defaults, the file if it
    /// exists, then `DEVSERVER_*` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("http.server_name", concat!("devserver/", env!("CARGO_PKG_VERSION")))?
            .set_default("livereload.check_path", "/livereload-check")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

impl LiveReloadConfig {
    /// Absolute serving root: the configured path, or the directory holding
    /// the running executable.
    pub fn resolve_root(&self) -> io::Result<PathBuf> {
        match &self.root {
            Some(root) => std::path::absolute(root),
            None => executable_dir(),
        }
    }
}

fn executable_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("Executable has no parent directory: {}", exe.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("definitely-missing-devserver-config").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.livereload.check_path, "/livereload-check");
        assert_eq!(cfg.livereload.watch_extensions, vec![".html", ".css", ".js"]);
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.livereload.root.is_none());
        assert!(cfg.logging.access_log);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[livereload]\nroot = \"/srv/site\"\nwatch_extensions = [\".md\"]"
        )
        .unwrap();

        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.livereload.root.as_deref(), Some("/srv/site"));
        assert_eq!(cfg.livereload.watch_extensions, vec![".md"]);
        assert_eq!(cfg.livereload.check_path, "/livereload-check");
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("definitely-missing-devserver-config").unwrap();
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_resolve_root() {
        let explicit = LiveReloadConfig {
            root: Some("/srv/site".to_string()),
            ..LiveReloadConfig::default()
        };
        assert_eq!(explicit.resolve_root().unwrap(), PathBuf::from("/srv/site"));

        let fallback = LiveReloadConfig::default().resolve_root().unwrap();
        assert!(fallback.is_absolute());
    }
}
