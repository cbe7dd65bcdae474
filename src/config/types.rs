// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Served site configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Build output directory
    pub root: String,
    /// Document served for directory paths
    #[serde(default = "default_index_file")]
    pub index_file: String,
    /// Page inside the root used as the 404 body, if present
    #[serde(default = "default_not_found_page")]
    pub not_found_page: Option<String>,
}

fn default_index_file() -> String {
    "index.html".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_not_found_page() -> Option<String> {
    Some("404.html".to_string())
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: "_site".to_string(),
            index_file: default_index_file(),
            not_found_page: default_not_found_page(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Log file path (optional, stdout if not set)
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Upper bound for a whole connection, in seconds
    pub request_timeout: u64,
    pub max_connections: Option<u64>,
}
