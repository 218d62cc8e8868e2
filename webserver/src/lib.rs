//! Webserver library for the SVG icon generation service
//!
//! Thin HTTP adapter over [`generator::IconGenerator`]: JSON in, JSON out,
//! with generator errors mapped onto HTTP status codes.

pub mod error;
pub mod state;
pub mod types;
pub mod web;
pub mod webserver_impl;

// Re-export main types
pub use error::{ApiError, WebServerError, WebServerResult};
pub use state::WebServerState;
pub use types::*;
pub use webserver_impl::WebServer;
