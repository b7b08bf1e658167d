//! HTTP Range request module
//!
//! Single byte-range support (RFC 7233). Multi-range requests and other
//! units are answered with the full representation.

/// Inclusive byte range inside a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered
    pub const fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a representation of `total` bytes
    pub fn content_range(&self, total: u64) -> String {
        format!("bytes {}-{}/{total}", self.start, self.end)
    }
}

/// How to answer a request given its Range header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header: send everything with 200
    Full,
    /// Send the range with 206
    Partial(ByteRange),
    /// Send 416
    Unsatisfiable,
}

/// Resolve a Range header against a representation of `total` bytes
///
/// # Examples
/// ```
/// use devserver::http::range::{resolve_range, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     resolve_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(resolve_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn resolve_range(header: Option<&str>, total: u64) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };

    match (first.trim(), last.trim()) {
        ("", "") => RangeOutcome::Full,
        ("", suffix) => suffix_range(suffix, total),
        (first, last) => bounded_range(first, last, total),
    }
}

/// `bytes=-N`: the final N bytes
fn suffix_range(suffix: &str, total: u64) -> RangeOutcome {
    let Ok(n) = suffix.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    if n == 0 || total == 0 {
        return RangeOutcome::Unsatisfiable;
    }
    RangeOutcome::Partial(ByteRange {
        start: total.saturating_sub(n),
        end: total - 1,
    })
}

/// `bytes=A-B` or `bytes=A-`
fn bounded_range(first: &str, last: &str, total: u64) -> RangeOutcome {
    let Ok(start) = first.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(end) if end >= start => Some(end),
            // Syntactically invalid per RFC 7233: ignore the header
            _ => return RangeOutcome::Full,
        }
    };

    if start >= total {
        return RangeOutcome::Unsatisfiable;
    }
    let last_byte = total - 1;
    RangeOutcome::Partial(ByteRange {
        start,
        end: end.map_or(last_byte, |e| e.min(last_byte)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(start: u64, end: u64) -> RangeOutcome {
        RangeOutcome::Partial(ByteRange { start, end })
    }

    #[test]
    fn test_bounded() {
        assert_eq!(resolve_range(Some("bytes=0-9"), 100), partial(0, 9));
        assert_eq!(resolve_range(Some("bytes=90-500"), 100), partial(90, 99));
    }

    #[test]
    fn test_open_ended() {
        let outcome = resolve_range(Some("bytes=50-"), 100);
        assert_eq!(outcome, partial(50, 99));
        if let RangeOutcome::Partial(range) = outcome {
            assert_eq!(range.len(), 50);
            assert_eq!(range.content_range(100), "bytes 50-99/100");
        }
    }

    #[test]
    fn test_suffix() {
        assert_eq!(resolve_range(Some("bytes=-20"), 100), partial(80, 99));
        assert_eq!(resolve_range(Some("bytes=-500"), 100), partial(0, 99));
        assert_eq!(
            resolve_range(Some("bytes=-0"), 100),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_unsatisfiable() {
        assert_eq!(
            resolve_range(Some("bytes=200-"), 100),
            RangeOutcome::Unsatisfiable
        );
        assert_eq!(
            resolve_range(Some("bytes=0-"), 0),
            RangeOutcome::Unsatisfiable
        );
    }

    #[test]
    fn test_ignored_headers() {
        assert_eq!(resolve_range(None, 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("items=0-9"), 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("bytes=a-b"), 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("bytes=0-9,20-29"), 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("bytes=9-0"), 100), RangeOutcome::Full);
        assert_eq!(resolve_range(Some("bytes=-"), 100), RangeOutcome::Full);
    }
}
