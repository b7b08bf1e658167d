//! Access log format module
//!
//! Supports multiple log formats:
//! - `common` (Common Log Format - CLF), the default
//! - `combined` (CLF plus referer and user agent)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variable` substitution

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log line layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessLogFormat {
    Common,
    Combined,
    Json,
    Custom(String),
}

impl AccessLogFormat {
    /// Parse the configured format name; anything unknown is a custom pattern
    pub fn parse(value: &str) -> Self {
        match value {
            "common" => Self::Common,
            "combined" => Self::Combined,
            "json" => Self::Json,
            pattern => Self::Custom(pattern.to_string()),
        }
    }
}

/// Access log entry for one served request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version as shown in the request line (1.0, 1.1)
    pub http_version: String,
    pub status: u16,
    /// Body bytes sent (0 for HEAD and 304)
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the given layout
    pub fn format(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Common => self.common_line(),
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                self.referer.as_deref().unwrap_or("-"),
                self.user_agent.as_deref().unwrap_or("-"),
            ),
            AccessLogFormat::Json => self.json_line(),
            AccessLogFormat::Custom(pattern) => self.custom_line(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    /// `host - - [time] "request" status bytes`; zero bytes render as `-`
    fn common_line(&self) -> String {
        let bytes = if self.body_bytes == 0 {
            "-".to_string()
        } else {
            self.body_bytes.to_string()
        };
        format!(
            "{} - - [{}] \"{}\" {} {bytes}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
        )
    }

    fn json_line(&self) -> String {
        format!(
            r#"{{"remote_addr":{},"time":{},"method":{},"path":{},"query":{},"http_version":{},"status":{},"body_bytes":{},"referer":{},"user_agent":{},"request_time_us":{}}}"#,
            json_string(&self.remote_addr),
            json_string(&self.time.to_rfc3339()),
            json_string(&self.method),
            json_string(&self.path),
            json_optional(self.query.as_deref()),
            json_string(&self.http_version),
            self.status,
            self.body_bytes,
            json_optional(self.referer.as_deref()),
            json_optional(self.user_agent.as_deref()),
            self.request_time_us,
        )
    }

    /// Substitute `$variables` in a custom pattern
    ///
    /// Supported: `$remote_addr`, `$time_local`, `$time_iso8601`, `$request`,
    /// `$request_method`, `$request_uri`, `$request_time`, `$status`,
    /// `$body_bytes_sent`, `$http_referer`, `$http_user_agent`.
    fn custom_line(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = format!("{:.3}", self.request_time_us as f64 / 1_000_000.0);

        // Longer names first so `$request` does not eat `$request_time`
        let substitutions = [
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format(CLF_TIME).to_string()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$request_method", self.method.clone()),
            ("$request_time", request_time),
            ("$request_uri", self.request_uri()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$http_referer", self.referer.clone().unwrap_or_else(|| "-".to_string())),
            (
                "$http_user_agent",
                self.user_agent.clone().unwrap_or_else(|| "-".to_string()),
            ),
        ];

        substitutions
            .iter()
            .fold(pattern.to_string(), |line, (name, value)| {
                line.replace(name, value)
            })
    }
}

fn json_optional(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_string(), json_string)
}

/// Quote and escape a JSON string
fn json_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1".to_string(),
            "GET".to_string(),
            "/css/site.css".to_string(),
        );
        entry.query = Some("v=2".to_string());
        entry.status = 200;
        entry.body_bytes = 512;
        entry.referer = Some("http://localhost:8080/".to_string());
        entry.user_agent = Some("Mozilla/5.0".to_string());
        entry.request_time_us = 1_250_000;
        entry
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(AccessLogFormat::parse("common"), AccessLogFormat::Common);
        assert_eq!(AccessLogFormat::parse("json"), AccessLogFormat::Json);
        assert_eq!(
            AccessLogFormat::parse("$status"),
            AccessLogFormat::Custom("$status".to_string())
        );
    }

    #[test]
    fn test_common() {
        let line = sample_entry().format(&AccessLogFormat::Common);
        assert!(line.starts_with("127.0.0.1 - - ["));
        assert!(line.ends_with("\"GET /css/site.css?v=2 HTTP/1.1\" 200 512"));
        assert!(!line.contains("Mozilla"));
    }

    #[test]
    fn test_common_zero_bytes() {
        let mut entry = sample_entry();
        entry.status = 304;
        entry.body_bytes = 0;
        assert!(entry.format(&AccessLogFormat::Common).ends_with(" 304 -"));
    }

    #[test]
    fn test_combined() {
        let line = sample_entry().format(&AccessLogFormat::Combined);
        assert!(line.ends_with("200 512 \"http://localhost:8080/\" \"Mozilla/5.0\""));
    }

    #[test]
    fn test_json() {
        let line = sample_entry().format(&AccessLogFormat::Json);
        assert!(line.contains(r#""remote_addr":"127.0.0.1""#));
        assert!(line.contains(r#""query":"v=2""#));
        assert!(line.contains(r#""status":200"#));
        assert!(line.contains(r#""body_bytes":512"#));
    }

    #[test]
    fn test_custom() {
        let line = sample_entry().format(&AccessLogFormat::Custom(
            "$request_method $request_uri $status $request_time".to_string(),
        ));
        assert_eq!(line, "GET /css/site.css?v=2 200 1.250");
    }

    #[test]
    fn test_json_escaping() {
        assert_eq!(json_string("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(json_string("\u{1}"), r#""\u0001""#);
    }
}
