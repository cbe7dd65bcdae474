//! Site module
//!
//! A `Site` is one build of the static site: its root directory, the instant
//! it was built and the page answered for unknown paths. All files share the
//! build time as their modification time.
//!
//! Requests read the site through a `SiteHandle`, which swaps a rebuilt site
//! in with a single pointer update.

pub mod resolve;

pub use resolve::{ResolveError, Resource, SiteFile};

use crate::config::SiteConfig;
use crate::http::cache;
use arc_swap::ArcSwap;
use hyper::body::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

/// Body of the 404 response when the site has no not-found page of its own
pub const DEFAULT_NOT_FOUND_BODY: &str = "Not found";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site root '{}' is not accessible: {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("site root '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("failed to read not-found page '{}': {source}", path.display())]
    NotFoundPage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One immutable build of the site
#[derive(Debug)]
pub struct Site {
    root: PathBuf,
    index_file: String,
    build_time: SystemTime,
    last_modified: String,
    not_found_page: Bytes,
}

impl Site {
    /// Load a site from its build output directory
    ///
    /// The build time is truncated to whole seconds so it round-trips through
    /// `Last-Modified` / `If-Modified-Since` unchanged.
    pub async fn load(config: &SiteConfig, build_time: SystemTime) -> Result<Self, SiteError> {
        let root = tokio::fs::canonicalize(&config.root)
            .await
            .map_err(|source| SiteError::Root {
                path: PathBuf::from(&config.root),
                source,
            })?;
        let meta = tokio::fs::metadata(&root)
            .await
            .map_err(|source| SiteError::Root {
                path: root.clone(),
                source,
            })?;
        if !meta.is_dir() {
            return Err(SiteError::NotADirectory(root));
        }

        let not_found_page = load_not_found_page(&root, config.not_found_page.as_deref()).await?;
        let build_time = cache::truncate_to_second(build_time);

        Ok(Self {
            root,
            index_file: config.index_file.clone(),
            build_time,
            last_modified: cache::format_http_date(build_time),
            not_found_page,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub const fn build_time(&self) -> SystemTime {
        self.build_time
    }

    /// Build time formatted as an HTTP-date
    pub fn last_modified(&self) -> &str {
        &self.last_modified
    }

    /// Body served with every 404
    pub fn not_found_page(&self) -> Bytes {
        self.not_found_page.clone()
    }

    /// Resolve a request path against this build
    pub async fn resolve(&self, request_path: &str) -> Result<Resource, ResolveError> {
        resolve::resolve(&self.root, &self.index_file, request_path).await
    }
}

/// Read the site's own not-found page, falling back to the fixed text
async fn load_not_found_page(root: &Path, page: Option<&str>) -> Result<Bytes, SiteError> {
    let default = || Bytes::from_static(DEFAULT_NOT_FOUND_BODY.as_bytes());
    let Some(page) = page.filter(|p| !p.is_empty()) else {
        return Ok(default());
    };

    let path = root.join(page.trim_start_matches('/'));
    match tokio::fs::read(&path).await {
        Ok(content) => Ok(Bytes::from(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(default()),
        Err(source) => Err(SiteError::NotFoundPage { path, source }),
    }
}

/// Shared, swappable reference to the site currently being served
#[derive(Debug, Clone)]
pub struct SiteHandle {
    current: Arc<ArcSwap<Site>>,
}

impl SiteHandle {
    pub fn new(site: Site) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(site)),
        }
    }

    /// Snapshot of the current build; stays consistent for the whole request
    pub fn current(&self) -> Arc<Site> {
        self.current.load_full()
    }

    /// Atomically replace the served site, returning the previous build
    pub fn replace(&self, site: Site) -> Arc<Site> {
        self.current.swap(Arc::new(site))
    }

    /// Reload the site from disk and stamp it with a new build time
    pub async fn rebuild(
        &self,
        config: &SiteConfig,
        build_time: SystemTime,
    ) -> Result<Arc<Site>, SiteError> {
        let site = Site::load(config, build_time).await?;
        self.replace(site);
        Ok(self.current())
    }
}
