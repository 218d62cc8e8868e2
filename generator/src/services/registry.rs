//! Provider registry: one client per `ProviderId`

use std::sync::Arc;

use shared::ProviderId;

use crate::config::GeneratorConfig;
use crate::services::{AnthropicClient, GeminiClient, OllamaClient, OpenAiClient};
use crate::traits::{HttpTransport, LlmClient};

/// Fixed mapping from provider identifier to client
///
/// Every variant has a slot, so lookups cannot fail.
#[derive(Clone)]
pub struct ProviderRegistry {
    openai: Arc<dyn LlmClient>,
    anthropic: Arc<dyn LlmClient>,
    gemini: Arc<dyn LlmClient>,
    ollama: Arc<dyn LlmClient>,
}

impl ProviderRegistry {
    pub fn new(
        openai: Arc<dyn LlmClient>,
        anthropic: Arc<dyn LlmClient>,
        gemini: Arc<dyn LlmClient>,
        ollama: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            openai,
            anthropic,
            gemini,
            ollama,
        }
    }

    /// Build the real clients, all sharing one transport
    pub fn from_config(config: &GeneratorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let sampling = config.sampling;
        Self::new(
            Arc::new(OpenAiClient::new(
                config.provider(ProviderId::OpenAI).clone(),
                sampling,
                transport.clone(),
            )),
            Arc::new(AnthropicClient::new(
                config.provider(ProviderId::Anthropic).clone(),
                sampling,
                transport.clone(),
            )),
            Arc::new(GeminiClient::new(
                config.provider(ProviderId::Gemini).clone(),
                sampling,
                transport.clone(),
            )),
            Arc::new(OllamaClient::new(
                config.provider(ProviderId::Ollama).clone(),
                sampling,
                transport,
            )),
        )
    }

    /// Replace the client registered for `provider`
    pub fn with_client(mut self, provider: ProviderId, client: Arc<dyn LlmClient>) -> Self {
        match provider {
            ProviderId::OpenAI => self.openai = client,
            ProviderId::Anthropic => self.anthropic = client,
            ProviderId::Gemini => self.gemini = client,
            ProviderId::Ollama => self.ollama = client,
        }
        self
    }

    pub fn client(&self, provider: ProviderId) -> Arc<dyn LlmClient> {
        match provider {
            ProviderId::OpenAI => self.openai.clone(),
            ProviderId::Anthropic => self.anthropic.clone(),
            ProviderId::Gemini => self.gemini.clone(),
            ProviderId::Ollama => self.ollama.clone(),
        }
    }
}
