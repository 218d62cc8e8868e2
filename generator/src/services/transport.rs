//! reqwest-backed HTTP transport shared by all provider clients

use async_trait::async_trait;
use serde_json::Value;
use shared::ProviderId;
use tracing::{debug, error};

use crate::error::{GeneratorError, GeneratorResult, ProviderError};
use crate::traits::HttpTransport;
use crate::types::OutboundRequest;

/// Longest slice of an error body quoted in a `ProviderError`
const ERROR_EXCERPT_CHARS: usize = 200;

/// Real transport holding one pooled `reqwest::Client` for the whole process
#[derive(Clone)]
pub struct RealHttpTransport {
    client: reqwest::Client,
}

impl RealHttpTransport {
    /// Create new transport with the default client settings
    pub fn new() -> GeneratorResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("svg-icon-generator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeneratorError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn classify(provider: ProviderId, request: &OutboundRequest, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::timeout(
                provider,
                format!("request timed out after {}s", request.timeout.as_secs_f64()),
            )
        } else {
            // Display without the URL so query strings never reach logs
            ProviderError::transport(provider, error.without_url().to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for RealHttpTransport {
    async fn post_json(&self, request: OutboundRequest) -> Result<Value, ProviderError> {
        let provider = request.provider;
        debug!(%provider, url = %request.url, "Sending provider request");

        let mut builder = self
            .client
            .post(&request.url)
            .timeout(request.timeout)
            .json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::classify(provider, &request, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(provider, &request, e))?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(ERROR_EXCERPT_CHARS).collect();
            error!(%provider, %status, "Provider returned error status");
            return Err(ProviderError::transport(provider, format!("HTTP {status}: {excerpt}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| ProviderError::malformed(provider, format!("response body is not JSON: {e}")))
    }
}
