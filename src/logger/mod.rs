//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber setup (stdout or a log file)
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//!
//! Access lines are emitted under the `access` target, so they can be
//! filtered separately, e.g. `RUST_LOG=info,access=off`.

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use crate::site::Site;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. When a log file is
/// configured, the returned guard must be held until shutdown so buffered
/// lines are flushed.
pub fn init(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let Some(log_file) = config.log_file.as_deref() else {
        fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(io::Error::other)?;
        return Ok(None);
    };

    let path = Path::new(log_file);
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log file '{log_file}' has no file name"),
        )
    })?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(Some(guard))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Server started, listening on http://{addr}");
    tracing::info!(
        workers = ?config.server.workers,
        max_connections = ?config.performance.max_connections,
        access_log = config.logging.access_log,
        "Runtime configuration"
    );
}

pub fn log_site_loaded(site: &Site) {
    tracing::info!(
        root = %site.root().display(),
        last_modified = site.last_modified(),
        "Serving site"
    );
}

pub fn log_site_rebuilt(site: &Site) {
    tracing::info!(
        root = %site.root().display(),
        last_modified = site.last_modified(),
        "Site rebuilt, new build time in effect"
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_invalid_path(path: &str) {
    tracing::warn!(path, "Rejected request path");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_shutdown() {
    tracing::info!("Shutdown requested, no longer accepting connections");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
