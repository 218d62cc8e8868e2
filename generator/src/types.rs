//! Generator-specific data types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::{Credential, ProviderId, SamplingOverrides};

use crate::pipeline::FALLBACK_SVG;

/// One icon generation request as received from a caller
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub description: String,
    /// `None` selects the configured default provider
    pub provider: Option<ProviderId>,
    pub model: Option<String>,
    pub credential: Option<Credential>,
    pub sampling: SamplingOverrides,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            provider: None,
            model: None,
            credential: None,
            sampling: SamplingOverrides::default(),
        }
    }

    pub fn with_provider(mut self, provider: ProviderId) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingOverrides) -> Self {
        self.sampling = sampling;
        self
    }
}

/// What the orchestrator hands to a provider client
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    pub sampling: SamplingOverrides,
    pub credential: Option<Credential>,
    pub model: Option<String>,
}

/// Unprocessed result of a provider call
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompletion {
    pub text: String,
    /// Model name echoed back by the provider
    pub model: String,
    /// Provider specific extras: finish reason, token usage, timings
    pub metadata: Map<String, Value>,
}

impl RawCompletion {
    pub fn new(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: model.into(),
            metadata: Map::new(),
        }
    }
}

/// Final result returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub markup: String,
    pub provider_used: ProviderId,
    pub model_used: String,
}

impl GenerationResult {
    /// Whether the markup is the fixed placeholder rather than generated content
    pub fn is_fallback(&self) -> bool {
        self.markup == FALLBACK_SVG
    }
}

/// A single JSON POST to a provider endpoint
#[derive(Clone, PartialEq)]
pub struct OutboundRequest {
    pub provider: ProviderId,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
    pub timeout: Duration,
}

impl OutboundRequest {
    pub fn new(provider: ProviderId, url: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            provider,
            url: url.into(),
            headers: Vec::new(),
            body,
            timeout,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

// Header values carry credentials
impl fmt::Debug for OutboundRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("OutboundRequest")
            .field("provider", &self.provider)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
