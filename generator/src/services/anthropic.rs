//! Anthropic messages API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{ProviderId, SamplingParams};

use crate::config::ProviderConfig;
use crate::error::{GeneratorResult, ProviderError};
use crate::services::support::{resolve_credential, resolve_model, str_at, text_at, u64_at, usage_value};
use crate::traits::{HttpTransport, LlmClient};
use crate::types::{CompletionRequest, OutboundRequest, RawCompletion};

const MESSAGES_PATH: &str = "/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    config: ProviderConfig,
    sampling: SamplingParams,
    transport: Arc<dyn HttpTransport>,
}

impl AnthropicClient {
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
            "max_tokens": sampling.max_tokens,
            "temperature": sampling.temperature,
            "top_p": sampling.top_p,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        })
    }

    fn parse_completion(response: &Value, model: &str) -> Result<RawCompletion, ProviderError> {
        let text = text_at(ProviderId::Anthropic, response, "/content/0/text")?;
        let mut completion = RawCompletion::new(text, str_at(response, "/model").unwrap_or_else(|| model.to_string()));

        if let Some(reason) = str_at(response, "/stop_reason") {
            completion.metadata.insert("stop_reason".into(), reason.into());
        }
        if let Some(usage) = usage_value(
            u64_at(response, "/usage/input_tokens"),
            u64_at(response, "/usage/output_tokens"),
        ) {
            completion.metadata.insert("usage".into(), usage);
        }
        Ok(completion)
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }

    async fn generate(&self, request: &CompletionRequest) -> GeneratorResult<RawCompletion> {
        let credential = resolve_credential(
            ProviderId::Anthropic,
            request.credential.as_ref(),
            self.config.api_key.as_ref(),
        )?;
        let model = resolve_model(request.model.as_deref(), &self.config.default_model);
        let sampling = request.sampling.resolve(&self.sampling);

        let outbound = OutboundRequest::new(
            ProviderId::Anthropic,
            self.config.endpoint(MESSAGES_PATH),
            Self::request_body(&request.prompt, &model, &sampling),
            self.config.timeout,
        )
        .with_header("x-api-key", credential.expose())
        .with_header("anthropic-version", API_VERSION);

        let response = self.transport.post_json(outbound).await?;
        Ok(Self::parse_completion(&response, &model)?)
    }
}
