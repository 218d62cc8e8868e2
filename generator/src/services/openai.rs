//! OpenAI chat-completions client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{ProviderId, SamplingParams};

use crate::config::ProviderConfig;
use crate::error::{GeneratorResult, ProviderError};
use crate::services::support::{resolve_credential, resolve_model, str_at, text_at, u64_at, usage_value};
use crate::traits::{HttpTransport, LlmClient};
use crate::types::{CompletionRequest, OutboundRequest, RawCompletion};

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiClient {
    config: ProviderConfig,
    sampling: SamplingParams,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiClient {
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
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
            "top_p": sampling.top_p
        })
    }

    fn parse_completion(response: &Value, model: &str) -> Result<RawCompletion, ProviderError> {
        let text = text_at(ProviderId::OpenAI, response, "/choices/0/message/content")?;
        let mut completion = RawCompletion::new(text, str_at(response, "/model").unwrap_or_else(|| model.to_string()));

        if let Some(reason) = str_at(response, "/choices/0/finish_reason") {
            completion.metadata.insert("finish_reason".into(), reason.into());
        }
        if let Some(usage) = usage_value(
            u64_at(response, "/usage/prompt_tokens"),
            u64_at(response, "/usage/completion_tokens"),
        ) {
            completion.metadata.insert("usage".into(), usage);
        }
        Ok(completion)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }

    async fn generate(&self, request: &CompletionRequest) -> GeneratorResult<RawCompletion> {
        let credential = resolve_credential(
            ProviderId::OpenAI,
            request.credential.as_ref(),
            self.config.api_key.as_ref(),
        )?;
        let model = resolve_model(request.model.as_deref(), &self.config.default_model);
        let sampling = request.sampling.resolve(&self.sampling);

        let outbound = OutboundRequest::new(
            ProviderId::OpenAI,
            self.config.endpoint(COMPLETIONS_PATH),
            Self::request_body(&request.prompt, &model, &sampling),
            self.config.timeout,
        )
        .with_header("Authorization", format!("Bearer {}", credential.expose()));

        let response = self.transport.post_json(outbound).await?;
        Ok(Self::parse_completion(&response, &model)?)
    }
}
