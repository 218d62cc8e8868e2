//! Icon generation orchestrator
//!
//! Drives one request through a fixed sequence of stages:
//! select provider, build prompt, invoke the model once, extract and
//! validate the markup, then assemble the result. Provider failures are
//! returned to the caller; only extraction failures degrade to the
//! placeholder icon.

use std::fmt;
use std::sync::Arc;

use shared::{process_error, ProcessId, ProviderId};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::GeneratorConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::pipeline;
use crate::prompt::build_prompt;
use crate::services::ProviderRegistry;
use crate::traits::HttpTransport;
use crate::types::{CompletionRequest, GenerationRequest, GenerationResult};

/// Longest accepted description, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Stages of a single generation, used for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectProvider,
    BuildPrompt,
    Invoke,
    ExtractAndValidate,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SelectProvider => "select_provider",
            Stage::BuildPrompt => "build_prompt",
            Stage::Invoke => "invoke",
            Stage::ExtractAndValidate => "extract_and_validate",
            Stage::Finalize => "finalize",
        };
        f.write_str(name)
    }
}

/// Entry point for icon generation; cheap to clone and share across tasks
#[derive(Clone)]
pub struct IconGenerator {
    registry: Arc<ProviderRegistry>,
    default_provider: ProviderId,
}

impl IconGenerator {
    pub fn new(registry: ProviderRegistry, default_provider: ProviderId) -> Self {
        Self {
            registry: Arc::new(registry),
            default_provider,
        }
    }

    /// Wire real provider clients from configuration
    pub fn from_config(config: &GeneratorConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(
            ProviderRegistry::from_config(config, transport),
            config.default_provider,
        )
    }

    pub fn default_provider(&self) -> ProviderId {
        self.default_provider
    }

    /// Generate one icon for `request`
    pub async fn generate(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResult> {
        let request_id = Uuid::new_v4();
        let span = info_span!("generate", %request_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &GenerationRequest) -> GeneratorResult<GenerationResult> {
        let description = validate_request(request)?;

        debug!(stage = %Stage::SelectProvider);
        let provider = request.provider.unwrap_or(self.default_provider);
        let client = self.registry.client(provider);

        debug!(stage = %Stage::BuildPrompt);
        let completion = CompletionRequest {
            prompt: build_prompt(description),
            sampling: request.sampling,
            credential: request.credential.clone(),
            model: request.model.clone(),
        };

        debug!(stage = %Stage::Invoke, %provider);
        let raw = client
            .generate(&completion)
            .await
            .inspect_err(|e| {
                process_error!(ProcessId::current(), %provider, kind = e.kind(), "Provider call failed: {e}")
            })?;

        debug!(stage = %Stage::ExtractAndValidate, bytes = raw.text.len());
        let markup = pipeline::process(&raw.text, description);

        debug!(stage = %Stage::Finalize);
        // Report the model that was asked for; providers often echo a dated snapshot name
        let model_used = match request.model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(model) => model.to_string(),
            None => client.default_model(),
        };
        if raw.model != model_used {
            debug!(echoed = %raw.model, requested = %model_used, "Provider echoed a different model name");
        }

        let result = GenerationResult {
            markup,
            provider_used: provider,
            model_used,
        };
        info!(
            %provider,
            model = %result.model_used,
            fallback = result.is_fallback(),
            "Generated icon"
        );
        Ok(result)
    }
}

/// Check caller input before any provider is touched; returns the trimmed description
fn validate_request(request: &GenerationRequest) -> GeneratorResult<&str> {
    let description = request.description.trim();
    if description.is_empty() {
        return Err(GeneratorError::invalid_input("description must not be empty"));
    }
    let chars = description.chars().count();
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(GeneratorError::invalid_input(format!(
            "description is {chars} characters, limit is {MAX_DESCRIPTION_CHARS}"
        )));
    }
    request.sampling.validate()?;
    Ok(description)
}
