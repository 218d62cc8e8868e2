//! Google Gemini generateContent client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{ProviderId, SamplingParams};

use crate::config::ProviderConfig;
use crate::error::{GeneratorResult, ProviderError};
use crate::services::support::{resolve_credential, resolve_model, str_at, text_at, u64_at, usage_value};
use crate::traits::{HttpTransport, LlmClient};
use crate::types::{CompletionRequest, OutboundRequest, RawCompletion};

pub struct GeminiClient {
    config: ProviderConfig,
    sampling: SamplingParams,
    transport: Arc<dyn HttpTransport>,
}

impl GeminiClient {
    pub fn new(config: ProviderConfig, sampling: SamplingParams, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            sampling,
            transport,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        self.config.endpoint(&format!("/v1beta/models/{model}:generateContent"))
    }

    fn request_body(prompt: &str, sampling: &SamplingParams) -> Value {
        json!({
            "contents": [
                {
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": sampling.temperature,
                "maxOutputTokens": sampling.max_tokens,
                "topP": sampling.top_p
            }
        })
    }

    fn parse_completion(response: &Value, model: &str) -> Result<RawCompletion, ProviderError> {
        let text = text_at(ProviderId::Gemini, response, "/candidates/0/content/parts/0/text")?;
        let echoed = str_at(response, "/modelVersion").unwrap_or_else(|| model.to_string());
        let mut completion = RawCompletion::new(text, echoed);

        if let Some(reason) = str_at(response, "/candidates/0/finishReason") {
            completion.metadata.insert("finish_reason".into(), reason.into());
        }
        // Gemini doesn't always provide token counts in the response
        if let Some(usage) = usage_value(
            u64_at(response, "/usageMetadata/promptTokenCount"),
            u64_at(response, "/usageMetadata/candidatesTokenCount"),
        ) {
            completion.metadata.insert("usage".into(), usage);
        }
        Ok(completion)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn default_model(&self) -> String {
        self.config.default_model.clone()
    }

    async fn generate(&self, request: &CompletionRequest) -> GeneratorResult<RawCompletion> {
        let credential = resolve_credential(
            ProviderId::Gemini,
            request.credential.as_ref(),
            self.config.api_key.as_ref(),
        )?;
        let model = resolve_model(request.model.as_deref(), &self.config.default_model);
        let sampling = request.sampling.resolve(&self.sampling);

        let outbound = OutboundRequest::new(
            ProviderId::Gemini,
            self.endpoint(&model),
            Self::request_body(&request.prompt, &sampling),
            self.config.timeout,
        )
        .with_header("x-goog-api-key", credential.expose());

        let response = self.transport.post_json(outbound).await?;
        Ok(Self::parse_completion(&response, &model)?)
    }
}
