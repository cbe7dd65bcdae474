//! Static site serving module
//!
//! Turns a resolved resource into a 200, 304 or 404 response.

use crate::handler::router::RequestContext;
use crate::http::{self, cache};
use crate::logger;
use crate::site::{ResolveError, Resource, Site};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::time::SystemTime;
use tokio::fs;

/// Resolve the request path against `site` and build the response
///
/// Rejected paths are answered like missing ones; filesystem failures
/// become a 500 instead of being hidden behind a 404.
pub async fn serve_site(ctx: &RequestContext<'_>, site: &Site) -> Response<Full<Bytes>> {
    let result = match site.resolve(ctx.path).await {
        Ok(resource) => build_response(&resource, ctx.if_modified_since, site, ctx.is_head).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(response) => response,
        Err(ResolveError::InvalidPath(path)) => {
            logger::log_invalid_path(&path);
            http::build_404_response(site.not_found_page(), ctx.is_head)
        }
        Err(e @ ResolveError::Io { .. }) => {
            logger::log_error(&format!("Failed to serve '{}': {e}", ctx.path));
            http::build_500_response(ctx.is_head)
        }
    }
}

/// Build the response for a resolved resource
///
/// - missing: 404 with the site's not-found page, whatever `If-Modified-Since` says
/// - client copy at least as new as the build: 304 without body or `Content-Length`
/// - otherwise: 200 with the raw file bytes, or only its headers for HEAD
pub async fn build_response(
    resource: &Resource,
    if_modified_since: Option<SystemTime>,
    site: &Site,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ResolveError> {
    let file = match resource {
        Resource::Found(file) => file,
        Resource::Missing => return Ok(http::build_404_response(site.not_found_page(), is_head)),
    };

    if cache::is_not_modified(if_modified_since, site.build_time()) {
        return Ok(http::build_304_response(site.last_modified()));
    }

    if is_head {
        return Ok(http::build_ok_head_response(
            file.len,
            file.content_type,
            site.last_modified(),
        ));
    }

    let content = fs::read(&file.path)
        .await
        .map_err(|source| ResolveError::Io {
            path: file.path.clone(),
            source,
        })?;

    Ok(http::build_ok_response(
        Bytes::from(content),
        file.content_type,
        site.last_modified(),
    ))
}
