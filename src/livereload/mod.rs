//! Live reload module
//!
//! Change detection for the reload-check route: a watch set, a recursive
//! mtime scan, and the canonical text form handed to polling clients.

pub mod scanner;
pub mod watch;

pub use scanner::{latest_change, ScanOutcome, Timestamp};
pub use watch::WatchSet;

use crate::logger;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root directory and watch set, fixed at startup
#[derive(Debug, Clone)]
pub struct ChangeScanner {
    root: Arc<PathBuf>,
    watch_set: Arc<WatchSet>,
}

impl ChangeScanner {
    pub fn new(root: PathBuf, watch_set: WatchSet) -> Self {
        Self {
            root: Arc::new(root),
            watch_set: Arc::new(watch_set),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.watch_set
    }

    /// Scan synchronously on the calling thread
    pub fn scan(&self) -> Timestamp {
        latest_change(&self.root, &self.watch_set)
    }

    /// Scan on the blocking pool and wait for the result.
    ///
    /// A panicked scan task is logged and reported as `Timestamp::ZERO`.
    pub async fn scan_blocking(&self) -> Timestamp {
        let scanner = self.clone();
        match tokio::task::spawn_blocking(move || scanner.scan()).await {
            Ok(ts) => ts,
            Err(e) => {
                logger::log_error(&format!("Change scan task failed: {e}"));
                Timestamp::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[tokio::test]
    async fn test_scan_blocking_matches_sync_scan() {
        let dir = tempfile::tempdir().unwrap();
        let file = std::fs::File::create(dir.path().join("app.js")).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(4242))
            .unwrap();

        let scanner = ChangeScanner::new(dir.path().to_path_buf(), WatchSet::default());
        assert_eq!(scanner.scan_blocking().await, scanner.scan());
        assert_eq!(scanner.scan_blocking().await.to_string(), "4242.0");
    }
}
