//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, header
//! extraction, dispatch to the site and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, cache};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{IF_MODIFIED_SINCE, REFERER, USER_AGENT};
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_modified_since: Option<SystemTime>,
}

/// Main entry point for HTTP request handling
///
/// The site is snapshotted once, so a concurrent rebuild never mixes files
/// of one build with the build time of another.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // The body of a GET/HEAD is never read
    let (parts, _body) = req.into_parts();
    let method = &parts.method;

    let response = if matches!(*method, Method::GET | Method::HEAD) {
        let ctx = RequestContext {
            path: parts.uri.path(),
            is_head: *method == Method::HEAD,
            if_modified_since: cache::parse_if_modified_since(header_str(
                &parts.headers,
                IF_MODIFIED_SINCE,
            )),
        };
        let site = state.site.current();
        static_files::serve_site(&ctx, &site).await
    } else {
        logger::log_warning(&format!("Method not allowed: {method}"));
        http::build_405_response()
    };

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(
            remote_addr.ip().to_string(),
            method.to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = format!("{:?}", parts.version)
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_str(&parts.headers, REFERER).map(ToString::to_string);
        entry.user_agent = header_str(&parts.headers, USER_AGENT).map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_str(headers: &HeaderMap, name: hyper::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
