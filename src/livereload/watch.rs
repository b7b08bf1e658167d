//! Watched extension set
//!
//! Ordered, duplicate-free list of file-name suffixes that count as
//! reload-relevant. Matching is a case-sensitive literal suffix check.

/// Set of watched file suffixes, each including its leading dot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSet {
    extensions: Vec<String>,
}

impl WatchSet {
    /// Build a watch set from configured extensions.
    ///
    /// Entries are trimmed, a missing leading `.` is added, empty entries
    /// are dropped and duplicates keep their first position.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim();
            if ext.is_empty() || ext == "." {
                continue;
            }
            let ext = if ext.starts_with('.') {
                ext.to_string()
            } else {
                format!(".{ext}")
            };
            if !normalized.contains(&ext) {
                normalized.push(ext);
            }
        }
        Self {
            extensions: normalized,
        }
    }

    /// Whether a file name ends with one of the watched suffixes
    pub fn matches(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for WatchSet {
    fn default() -> Self {
        Self::new([".html", ".css", ".js"])
    }
}

impl std::fmt::Display for WatchSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.extensions.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_set() {
        let set = WatchSet::default();
        assert_eq!(set.extensions(), &[".html", ".css", ".js"]);
        assert_eq!(set.to_string(), ".html, .css, .js");
    }

    #[test]
    fn test_normalization() {
        let set = WatchSet::new(["css", ".css", " js ", "", "."]);
        assert_eq!(set.extensions(), &[".css", ".js"]);
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        let set = WatchSet::default();
        assert!(set.matches("index.html"));
        assert!(set.matches("app.min.js"));
        assert!(!set.matches("INDEX.HTML"));
        assert!(!set.matches("logo.png"));
        assert!(!set.matches("script.json"));
        assert!(!set.matches("style.css.map"));
    }
}
