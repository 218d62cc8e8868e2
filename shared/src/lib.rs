//! Shared types for the SVG icon generation service
//!
//! Contains the provider identifiers, sampling parameters and request/result
//! types used by both the generator library and the HTTP adapter, plus the
//! process-aware logging setup every binary uses.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
