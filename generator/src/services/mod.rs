//! Generator services implementations

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;
pub mod registry;
pub(crate) mod support;
pub mod transport;

#[cfg(test)]
pub mod tests;

pub use anthropic::*;
pub use gemini::*;
pub use ollama::*;
pub use openai::*;
pub use registry::*;
pub use transport::*;
