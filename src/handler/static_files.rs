//! Static file serving module
//!
//! Resolves request paths under the serving root and answers with file
//! contents, index files, directory listings or redirects.

use crate::handler::router::RequestContext;
use crate::http::response::{build_file_response, build_html_response, build_partial_response, FileHeaders};
use crate::http::{self, cache, mime, HttpResponse, RangeOutcome};
use crate::logger;
use hyper::body::Bytes;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Characters left unescaped in listing links
const LINK_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Serve a request from the directory tree under `root`
pub async fn serve(ctx: &RequestContext<'_>, root: &Path, index_files: &[String]) -> HttpResponse {
    let Some(target) = resolve_path(root, ctx.path) else {
        return http::build_404_response();
    };
    let Ok(meta) = fs::metadata(&target).await else {
        return http::build_404_response();
    };

    if !meta.is_dir() {
        return serve_file(ctx, &target, &meta).await;
    }

    // Relative links in the page only resolve with the trailing slash
    if !ctx.path.ends_with('/') {
        let location = match ctx.query {
            Some(q) => format!("{}/?{q}", ctx.path),
            None => format!("{}/", ctx.path),
        };
        return http::build_redirect_response(&location);
    }

    for index in index_files {
        let candidate = target.join(index);
        if let Ok(index_meta) = fs::metadata(&candidate).await {
            if index_meta.is_file() {
                return serve_file(ctx, &candidate, &index_meta).await;
            }
        }
    }

    serve_listing(ctx, &target).await
}

/// Map a URL path onto the filesystem below `root`
///
/// Percent-escapes are decoded; empty, `.` and `..` segments are dropped so
/// the URL can never climb above `root`. Symlinks inside the tree are
/// followed wherever they point.
pub fn resolve_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8_lossy();
    if decoded.contains('\0') {
        return None;
    }

    let mut resolved = root.to_path_buf();
    for segment in decoded.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        if cfg!(windows) && (segment.contains('\\') || segment.contains(':')) {
            return None;
        }
        resolved.push(segment);
    }
    Some(resolved)
}

/// Serve one file with validators, conditional requests and ranges
async fn serve_file(ctx: &RequestContext<'_>, path: &Path, meta: &Metadata) -> HttpResponse {
    let modified = meta.modified().ok();
    let etag = cache::file_etag(meta.len(), modified);
    let last_modified = modified.map(cache::format_http_date);

    // If-None-Match takes precedence over If-Modified-Since
    let fresh = if ctx.if_none_match.is_some() {
        cache::check_etag_match(ctx.if_none_match, &etag)
    } else {
        cache::not_modified_since(ctx.if_modified_since, modified)
    };
    if fresh {
        return http::build_304_response(&etag, last_modified.as_deref());
    }

    let data = match fs::read(path).await {
        Ok(data) => Bytes::from(data),
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            return http::build_404_response();
        }
    };

    let headers = FileHeaders {
        content_type: mime::content_type_for(path),
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };
    let total = data.len() as u64;

    match http::resolve_range(ctx.range_header, total) {
        RangeOutcome::Full => build_file_response(data, &headers, ctx.is_head),
        RangeOutcome::Unsatisfiable => http::build_416_response(total),
        RangeOutcome::Partial(range) => match slice_range(&data, range) {
            Some(part) => build_partial_response(part, range, total, &headers, ctx.is_head),
            None => http::build_416_response(total),
        },
    }
}

fn slice_range(data: &Bytes, range: http::ByteRange) -> Option<Bytes> {
    let start = usize::try_from(range.start).ok()?;
    let end = usize::try_from(range.end).ok()?;
    (start <= end && end < data.len()).then(|| data.slice(start..=end))
}

/// Serve an HTML listing of a directory without an index file
async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> HttpResponse {
    let mut reader = match fs::read_dir(dir).await {
        Ok(reader) => reader,
        Err(e) => {
            logger::log_warning(&format!("Cannot list directory '{}': {e}", dir.display()));
            return http::build_404_response();
        }
    };

    let mut entries = Vec::new();
    while let Ok(Some(entry)) = reader.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().await.ok();
        let is_symlink = file_type.is_some_and(|t| t.is_symlink());
        // Follow symlinks to decide whether the link needs a slash
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }

    let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
    build_html_response(render_listing(&display_path, entries), ctx.is_head)
}

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Render a listing page; entries are sorted case-insensitively
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));

    for entry in &entries {
        let (display, link) = if entry.is_dir {
            (format!("{}/", entry.name), format!("{}/", entry.name))
        } else if entry.is_symlink {
            (format!("{}@", entry.name), entry.name.clone())
        } else {
            (entry.name.clone(), entry.name.clone())
        };
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&link, LINK_SAFE),
            escape_html(&display)
        ));
    }

    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
