//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the site being served.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_ok_head_response, build_ok_response,
};
