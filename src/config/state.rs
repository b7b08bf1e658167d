// Application state module
// Immutable per-process state shared by every connection

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::livereload::{ChangeScanner, WatchSet};

/// Application state
pub struct AppState {
    pub config: Config,
    pub scanner: ChangeScanner,
}

impl AppState {
    /// Build state from configuration, resolving the serving root
    pub fn new(config: &Config) -> io::Result<Self> {
        let root = config.livereload.resolve_root()?;
        Ok(Self::with_root(config.clone(), root))
    }

    /// Build state with an explicit serving root
    pub fn with_root(config: Config, root: PathBuf) -> Self {
        let watch_set = WatchSet::new(&config.livereload.watch_extensions);
        Self {
            scanner: ChangeScanner::new(root, watch_set),
            config,
        }
    }

    /// Directory served for static requests and scanned for changes
    pub fn root(&self) -> &Path {
        self.scanner.root()
    }

    pub fn check_path(&self) -> &str {
        &self.config.livereload.check_path
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
