//! Self-hosted Ollama client
//!
//! Local instances normally run without authentication, so a credential is
//! optional here. When one is supplied (per call or configured) it is sent as
//! a bearer token for deployments behind an authenticating proxy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{ProviderId, SamplingParams};

use crate::config::ProviderConfig;
use crate::error::{GeneratorResult, ProviderError};
use crate::services::support::{resolve_model, str_at, text_at, u64_at, usage_value};
use crate::traits::{HttpTransport, LlmClient};
use crate::types::{CompletionRequest, OutboundRequest, RawCompletion};

const GENERATE_PATH: &str = "/api/generate";

pub struct OllamaClient {
    config: ProviderConfig,
    sampling: SamplingParams,
    transport: Arc<dyn HttpTransport>,
}

impl OllamaClient {
    pub fn new(config: ProviderConfig, sampling: SamplingParams, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            sampling,
            transport,
        }
    }

    fn request_body(prompt: &str, model: &str, sampling: &SamplingParams) -> Value {
        json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "temperature": sampling.temperature,
                "num_predict": sampling.max_tokens,
                "top_p": sampling.top_p
            }
        })
    }

    fn parse_completion(response: &Value, model: &str) -> Result<RawCompletion, ProviderError> {
        let text = text_at(ProviderId::Ollama, response, "/response")?;
        let mut completion = RawCompletion::new(text, str_at(response, "/model").unwrap_or_else(|| model.to_string()));

        for key in ["total_duration", "load_duration", "prompt_eval_count", "eval_count"] {
            if let Some(value) = u64_at(response, &format!("/{key}")) {
                completion.metadata.insert(key.into(), value.into());
            }
        }
        if let Some(usage) = usage_value(
            u64_at(response, "/prompt_eval_count"),
            u64_at(response, "/eval_count"),
        ) {
            completion.metadata.insert("usage".into(), usage);
        }
        Ok(completion)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    fn provider(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }

    async fn generate(&self, request: &CompletionRequest) -> GeneratorResult<RawCompletion> {
        let model = resolve_model(request.model.as_deref(), &self.config.default_model);
        let sampling = request.sampling.resolve(&self.sampling);

        let mut outbound = OutboundRequest::new(
            ProviderId::Ollama,
            self.config.endpoint(GENERATE_PATH),
            Self::request_body(&request.prompt, &model, &sampling),
            self.config.timeout,
        );
        if let Some(credential) = request.credential.as_ref().or(self.config.api_key.as_ref()) {
            outbound = outbound.with_header("Authorization", format!("Bearer {}", credential.expose()));
        }

        let response = self.transport.post_json(outbound).await?;
        Ok(Self::parse_completion(&response, &model)?)
    }
}
