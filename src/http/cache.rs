//! HTTP cache control module
//!
//! Provides validators (`ETag`, `Last-Modified`) and conditional request handling.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Build a strong `ETag` from file metadata
///
/// Size and mtime are enough for a dev server: any save changes the mtime.
///
/// # Returns
/// Quoted `ETag` string, e.g., `"1a2b-65f0c1d2.1c9c380"`
pub fn file_etag(len: u64, modified: Option<SystemTime>) -> String {
    let (secs, nanos) = modified
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map_or((0, 0), |d| (d.as_secs(), d.subsec_nanos()));
    format!("\"{len:x}-{secs:x}.{nanos:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list, and the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|candidate| candidate == etag || candidate == "*")
    })
}

/// Format a time as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Parse an HTTP date header value
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether `If-Modified-Since` says the client copy is still fresh
///
/// Compared at whole-second precision, as the header carries no fraction.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Some(since) = parse_http_date(header) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Cache but revalidate on every use
    NoCache,
    /// Never store
    NoStore,
}

impl CachePolicy {
    /// Cache-Control header value
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::NoCache => "no-cache",
            Self::NoStore => "no-store",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_file_etag_format() {
        let t = UNIX_EPOCH + Duration::new(16, 5);
        assert_eq!(file_etag(255, Some(t)), "\"ff-10.5\"");
        assert_eq!(file_etag(0, None), "\"0-0.0\"");
    }

    #[test]
    fn test_file_etag_changes_with_mtime() {
        let a = UNIX_EPOCH + Duration::from_secs(1000);
        let b = UNIX_EPOCH + Duration::from_secs(1001);
        assert_ne!(file_etag(10, Some(a)), file_etag(10, Some(b)));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date_round_trip() {
        let t = UNIX_EPOCH + Duration::from_secs(784_111_777);
        let formatted = format_http_date(t);
        assert_eq!(formatted, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_http_date(&formatted).unwrap().timestamp(), 784_111_777);
    }

    #[test]
    fn test_not_modified_since() {
        let modified = UNIX_EPOCH + Duration::from_millis(784_111_777_400);
        let same_second = "Sun, 06 Nov 1994 08:49:37 GMT";
        let earlier = "Sun, 06 Nov 1994 08:49:36 GMT";
        assert!(not_modified_since(Some(same_second), Some(modified)));
        assert!(!not_modified_since(Some(earlier), Some(modified)));
        assert!(!not_modified_since(Some("garbage"), Some(modified)));
        assert!(!not_modified_since(None, Some(modified)));
        assert!(!not_modified_since(Some(same_second), None));
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(CachePolicy::NoCache.header_value(), "no-cache");
        assert_eq!(CachePolicy::NoStore.header_value(), "no-store");
    }
}
