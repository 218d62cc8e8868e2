//! Generator library for SVG icon generation
//!
//! Turns a natural-language icon description into SVG markup by delegating to
//! one of several LLM providers, then extracting and validating the markup from
//! the free-text reply. Infrastructure failures are returned as errors; replies
//! without usable markup degrade to a fixed placeholder document.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod pipeline;
pub mod prompt;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::{GeneratorConfig, ProviderConfig, ProviderSettings};
pub use error::{GeneratorError, GeneratorResult, ProviderError, ProviderErrorKind};
pub use orchestrator::{IconGenerator, MAX_DESCRIPTION_CHARS};
pub use pipeline::{Extraction, FallbackReason, FALLBACK_SVG};
pub use services::*;
pub use traits::*;
pub use types::*;
