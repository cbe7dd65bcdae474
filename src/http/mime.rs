//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::path::Path;

/// Content-Type used for HTML pages, directory indexes and the not-found page
pub const TEXT_HTML: &str = "text/html";

/// Get MIME Content-Type based on file extension
///
/// A missing extension is treated as an HTML page, an unknown one as opaque bytes.
///
/// # Examples
/// ```
/// use sitecast::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), "text/html");
/// assert_eq!(get_content_type(Some("js")), "application/javascript");
/// assert_eq!(get_content_type(None), "text/html");
/// assert_eq!(get_content_type(Some("bin")), "application/octet-stream");
/// ```
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    let Some(ext) = extension else {
        return TEXT_HTML;
    };

    match ext.to_ascii_lowercase().as_str() {
        // Text
        "html" | "htm" => TEXT_HTML,
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "xml" => "application/xml",
        "rss" => "application/rss+xml",
        "atom" => "application/atom+xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        // Default
        _ => "application/octet-stream",
    }
}

/// Get Content-Type for a file path
///
/// Only the last extension counts, so `app.min.js` is JavaScript.
pub fn content_type_for_path(path: &Path) -> &'static str {
    get_content_type(path.extension().and_then(|e| e.to_str()))
}
