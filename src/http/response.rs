//! HTTP response building module
//!
//! Builders for the status codes the dev server emits, decoupled from routing.

use super::cache::CachePolicy;
use super::range::ByteRange;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
    LAST_MODIFIED, LOCATION,
};
use hyper::{Response, StatusCode};

pub type HttpResponse = Response<Full<Bytes>>;

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Validators and type of a file representation
#[derive(Debug, Clone)]
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Build 200 `text/plain` response with an explicit cache policy
///
/// `Content-Length` always reflects the text, also for HEAD.
pub fn build_text_response(text: String, policy: CachePolicy, is_head: bool) -> HttpResponse {
    let content_length = text.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(text)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_LENGTH, content_length)
        .header(CACHE_CONTROL, policy.header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200 text", &e))
}

/// Build 200 HTML response (directory listings)
pub fn build_html_response(html: String, is_head: bool) -> HttpResponse {
    let content_length = html.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(html)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .header(CACHE_CONTROL, CachePolicy::NoCache.header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200 HTML", &e))
}

/// Build 200 response carrying a whole file
pub fn build_file_response(data: Bytes, headers: &FileHeaders<'_>, is_head: bool) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, headers.content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, headers.etag)
        .header(CACHE_CONTROL, CachePolicy::NoCache.header_value());
    if let Some(last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("200", &e))
}

/// Build 206 Partial Content response; `data` holds only the range bytes
pub fn build_partial_response(
    data: Bytes,
    range: ByteRange,
    total_size: u64,
    headers: &FileHeaders<'_>,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(StatusCode::PARTIAL_CONTENT)
        .header(CONTENT_TYPE, headers.content_type)
        .header(CONTENT_LENGTH, range.len())
        .header(CONTENT_RANGE, range.content_range(total_size))
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, headers.etag)
        .header(CACHE_CONTROL, CachePolicy::NoCache.header_value());
    if let Some(last_modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback("206", &e))
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str, last_modified: Option<&str>) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, etag)
        .header(CACHE_CONTROL, CachePolicy::NoCache.header_value());
    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("304", &e))
}

/// Build 301 redirect, used to add a directory's trailing slash
pub fn build_redirect_response(location: &str) -> HttpResponse {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("301", &e))
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    plain_error(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    let mut resp = plain_error(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    resp
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(total_size: u64) -> HttpResponse {
    let mut resp = plain_error(StatusCode::RANGE_NOT_SATISFIABLE, "416 Range Not Satisfiable");
    if let Ok(value) = format!("bytes */{total_size}").parse() {
        resp.headers_mut().insert(CONTENT_RANGE, value);
    }
    resp
}

/// Build OPTIONS response
pub fn build_options_response() -> HttpResponse {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback("OPTIONS", &e))
}

fn plain_error(status: StatusCode, message: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .header(CONTENT_LENGTH, message.len())
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(message.as_bytes())))
        })
}

fn fallback(status: &str, error: &hyper::http::Error) -> HttpResponse {
    log_build_error(status, error);
    Response::new(Full::new(Bytes::new()))
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: HttpResponse) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_text_response_headers() {
        let resp = build_text_response("2000.0".to_string(), CachePolicy::NoStore, false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "6");
        assert_eq!(resp.headers()[CACHE_CONTROL], "no-store");
        assert_eq!(body_string(resp).await, "2000.0");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_text_response("0".to_string(), CachePolicy::NoStore, true);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "1");
        assert_eq!(body_string(resp).await, "");
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()[ALLOW], ALLOWED_METHODS);
        let resp = build_416_response(42);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */42");
    }

    #[test]
    fn test_redirect() {
        let resp = build_redirect_response("/docs/");
        assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(resp.headers()[LOCATION], "/docs/");
    }
}
