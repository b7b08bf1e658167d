//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, the
//! reload-check route, delegation to static file serving and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::cache::CachePolicy;
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use hyper::body::Body as _;
use hyper::header::{
    HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE, REFERER, SERVER, USER_AGENT,
};
use hyper::{Method, Request, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URI path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub if_modified_since: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = |name: HeaderName| req.headers().get(name).and_then(|v| v.to_str().ok());
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
            range_header: header(RANGE),
        }
    }
}

/// Which handler a request path belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Latest-change timestamp, never access-logged
    ReloadCheck,
    /// Everything else
    Static,
}

impl Route {
    /// Classify by exact path match; the query string plays no part
    pub fn classify(path: &str, check_path: &str) -> Self {
        if path == check_path {
            Self::ReloadCheck
        } else {
            Self::Static
        }
    }

    /// Whether requests on this route reach the access log
    pub const fn is_access_logged(self, access_log_enabled: bool) -> bool {
        access_log_enabled && matches!(self, Self::Static)
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let route = Route::classify(req.uri().path(), state.check_path());

    let mut response = dispatch(&req, route, &state).await;
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if route.is_access_logged(state.access_log_enabled()) {
        let entry = access_entry(&req, &response, peer_addr, started);
        let format = AccessLogFormat::parse(&state.config.logging.access_log_format);
        logger::log_access(&entry, &format);
    }

    Ok(response)
}

/// Produce the response for a classified request
pub async fn dispatch<B>(req: &Request<B>, route: Route, state: &AppState) -> HttpResponse {
    if let Some(resp) = check_http_method(req.method()) {
        return resp;
    }

    let ctx = RequestContext::from_request(req);
    match route {
        Route::ReloadCheck => serve_reload_check(&ctx, state).await,
        Route::Static => {
            static_files::serve(&ctx, state.root(), &state.config.http.index_files).await
        }
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_debug(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Answer the reload-check route with a fresh scan
async fn serve_reload_check(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let latest = state.scanner.scan_blocking().await;
    http::build_text_response(latest.to_string(), CachePolicy::NoStore, ctx.is_head)
}

fn access_entry<B>(
    req: &Request<B>,
    response: &HttpResponse,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
