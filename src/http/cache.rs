//! HTTP cache control module
//!
//! Provides HTTP-date handling and `If-Modified-Since` evaluation.
//! Every resource of a site shares the site's build time as its
//! modification time, so the comparison is always against that single instant.

use httpdate::{fmt_http_date, parse_http_date};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Drop the sub-second part of a timestamp
///
/// HTTP-dates carry whole seconds only. A build time that still has its
/// nanoseconds would compare greater than its own `Last-Modified` echo.
pub fn truncate_to_second(time: SystemTime) -> SystemTime {
    time.duration_since(UNIX_EPOCH)
        .map_or(time, |d| UNIX_EPOCH + Duration::from_secs(d.as_secs()))
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    fmt_http_date(time)
}

/// Parse the client's `If-Modified-Since` header
///
/// Malformed dates are ignored, as if the header had not been sent.
pub fn parse_if_modified_since(value: Option<&str>) -> Option<SystemTime> {
    value.and_then(|v| parse_http_date(v.trim()).ok())
}

/// Check if the client's cached copy is still current
///
/// # Arguments
/// * `if_modified_since` - Parsed `If-Modified-Since` header
/// * `build_time` - Build time of the site being served
///
/// # Returns
/// Returns true if the client copy is at least as new as the build (should return 304)
pub fn is_not_modified(if_modified_since: Option<SystemTime>, build_time: SystemTime) -> bool {
    if_modified_since.is_some_and(|since| since >= truncate_to_second(build_time))
}
