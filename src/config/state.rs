// Application state module
// Owns the loaded configuration and the site currently being served

use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Notify;

use super::types::Config;
use crate::site::{Site, SiteError, SiteHandle};

/// Application state, shared by every connection
pub struct AppState {
    pub config: Config,
    pub site: SiteHandle,
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(config: Config, site: Site) -> Self {
        Self {
            config,
            site: SiteHandle::new(site),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Load the configured site with the current time as its build time
    pub async fn load(config: Config) -> Result<Self, SiteError> {
        let site = Site::load(&config.site, SystemTime::now()).await?;
        Ok(Self::new(config, site))
    }

    /// Swap in a freshly loaded site; the old one stays served on failure
    pub async fn rebuild_site(&self) -> Result<Arc<Site>, SiteError> {
        self.site
            .rebuild(&self.config.site, SystemTime::now())
            .await
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
