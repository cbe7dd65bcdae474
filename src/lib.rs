//! sitecast: serves a pre-built static site over HTTP
//!
//! Every file of a site shares the site's build time as `Last-Modified`;
//! `If-Modified-Since` is answered against that single instant.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod site;
