//! Path resolution module
//!
//! Maps a request path onto a file below the site root.

use crate::http::mime;
use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Longest path segment accepted, matching the common `NAME_MAX`
const MAX_SEGMENT_LEN: usize = 255;

/// A file of the site that can be served
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteFile {
    /// Canonical path of the file
    pub path: PathBuf,
    /// Content-Type inferred from the requested file name
    pub content_type: &'static str,
    /// File size in bytes at resolution time
    pub len: u64,
}

/// Outcome of resolving a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Found(SiteFile),
    Missing,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Traversal attempt or malformed path, rejected before any filesystem access
    #[error("invalid request path '{0}'")]
    InvalidPath(String),

    /// Filesystem failure other than non-existence
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Resolve a URL path against the site root
///
/// # Arguments
/// * `root` - Canonical site root
/// * `index_file` - Document served for directory paths
/// * `request_path` - Raw URL path, e.g. `/css/site.css`
pub async fn resolve(
    root: &Path,
    index_file: &str,
    request_path: &str,
) -> Result<Resource, ResolveError> {
    let relative = sanitize_path(request_path)?;
    let mut candidate = root.join(relative);

    let Some(mut meta) = stat(&candidate).await? else {
        return Ok(Resource::Missing);
    };

    // Directory (including the root itself): serve its index document
    if meta.is_dir() {
        candidate.push(index_file);
        meta = match stat(&candidate).await? {
            Some(m) => m,
            None => return Ok(Resource::Missing),
        };
    }

    if !meta.is_file() {
        return Ok(Resource::Missing);
    }

    // Symlinks may still point outside the root
    let canonical = fs::canonicalize(&candidate)
        .await
        .map_err(|source| io_error(&candidate, source))?;
    if !canonical.starts_with(root) {
        return Err(ResolveError::InvalidPath(request_path.to_string()));
    }

    Ok(Resource::Found(SiteFile {
        content_type: mime::content_type_for_path(&candidate),
        path: canonical,
        len: meta.len(),
    }))
}

/// Turn a URL path into a relative filesystem path
///
/// The path is percent-decoded once. Empty and `.` segments are dropped,
/// anything else that is not a plain name of at most `MAX_SEGMENT_LEN`
/// bytes is rejected.
fn sanitize_path(request_path: &str) -> Result<PathBuf, ResolveError> {
    let invalid = || ResolveError::InvalidPath(request_path.to_string());

    if !request_path.starts_with('/') {
        return Err(invalid());
    }

    let decoded = percent_decode_str(request_path)
        .decode_utf8()
        .map_err(|_| invalid())?;
    if decoded.contains(['\0', '\\']) {
        return Err(invalid());
    }

    let mut relative = PathBuf::new();
    for segment in decoded.split('/').filter(|s| !s.is_empty() && *s != ".") {
        let plain = Path::new(segment)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain || segment.len() > MAX_SEGMENT_LEN {
            return Err(invalid());
        }
        relative.push(segment);
    }

    Ok(relative)
}

/// Stat a path, mapping "does not exist" to `None`
async fn stat(path: &Path) -> Result<Option<Metadata>, ResolveError> {
    match fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if is_missing(&e) => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// A path through a regular file (`/index.html/x`) is missing, not broken
fn is_missing(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

fn io_error(path: &Path, source: io::Error) -> ResolveError {
    ResolveError::Io {
        path: path.to_path_buf(),
        source,
    }
}
