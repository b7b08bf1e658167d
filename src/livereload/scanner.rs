//! Change scanner
//!
//! Walks the serving root and reports the newest modification time among
//! watched files. Every call rescans; nothing is cached between requests.

use super::watch::WatchSet;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Latest modification time, in seconds since the Unix epoch.
///
/// `Timestamp::ZERO` means "no known changes": nothing matched or nothing
/// could be stat'ed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const ZERO: Self = Self(0.0);

    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    #[allow(clippy::float_cmp)]
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

/// Canonical text form compared byte-for-byte by polling clients.
///
/// Zero renders as `0`; anything else as the shortest round-trip decimal,
/// always with a fractional part (`2000.0`, `1700000000.25`).
impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            f.write_str("0")
        } else {
            write!(f, "{:?}", self.0)
        }
    }
}

/// Result of inspecting a single watched file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanOutcome {
    Modified(Timestamp),
    /// Stat failed or the mtime is unusable; contributes nothing
    Skipped,
}

impl ScanOutcome {
    /// Stat a path, following symlinks, and classify the result
    pub fn inspect(path: &Path) -> Self {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(to_timestamp)
            .map_or(Self::Skipped, Self::Modified)
    }

    /// Contribution to the max-fold; `Skipped` is the identity
    pub const fn value(self) -> Timestamp {
        match self {
            Self::Modified(ts) => ts,
            Self::Skipped => Timestamp::ZERO,
        }
    }
}

fn to_timestamp(time: SystemTime) -> Option<Timestamp> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| Timestamp::from_secs(d.as_secs_f64()))
}

/// Newest modification time among watched files under `root`.
///
/// Never fails: a missing root, unreadable directories and files that
/// vanish between listing and stat all fold to the identity value.
pub fn latest_change(root: &Path, watch_set: &WatchSet) -> Timestamp {
    let mut visited = HashSet::new();
    let mut outcomes = Vec::new();
    collect_outcomes(root, watch_set, &mut visited, &mut outcomes);
    outcomes
        .into_iter()
        .map(ScanOutcome::value)
        .fold(Timestamp::ZERO, Timestamp::max)
}

/// Recursively inspect watched files below `dir`.
///
/// Hidden entries are skipped. Directory symlinks are followed; each
/// canonical directory is entered at most once, so link cycles terminate.
fn collect_outcomes(
    dir: &Path,
    watch_set: &WatchSet,
    visited: &mut HashSet<PathBuf>,
    outcomes: &mut Vec<ScanOutcome>,
) {
    let Ok(canonical) = fs::canonicalize(dir) else {
        return;
    };
    if !visited.insert(canonical) {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with('.') {
            continue;
        }

        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let path = entry.path();
        let is_dir = if file_type.is_symlink() {
            path.is_dir()
        } else {
            file_type.is_dir()
        };

        if is_dir {
            collect_outcomes(&path, watch_set, visited, outcomes);
        } else if watch_set.matches(&name) {
            outcomes.push(ScanOutcome::inspect(&path));
        }
    }
}
