//! Generator trait definitions for dependency injection

use async_trait::async_trait;
use serde_json::Value;
use shared::ProviderId;

use crate::error::{GeneratorResult, ProviderError};
use crate::types::{CompletionRequest, OutboundRequest, RawCompletion};

/// A text-generation backend: one prompt in, one text blob out
#[mockall::automock]
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider this client talks to
    fn provider(&self) -> ProviderId;

    /// Model used when the request does not name one
    fn default_model(&self) -> String;

    /// Issue exactly one completion call
    async fn generate(&self, request: &CompletionRequest) -> GeneratorResult<RawCompletion>;
}

/// JSON-over-HTTP transport used by every provider client
#[mockall::automock]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST the request body and return the decoded JSON reply
    async fn post_json(&self, request: OutboundRequest) -> Result<Value, ProviderError>;
}
