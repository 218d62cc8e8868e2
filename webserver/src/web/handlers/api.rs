//! REST API handlers

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::Json;
use generator::{GenerationRequest, GenerationResult};
use serde_json::{json, Value};
use shared::{Credential, ProviderId, SamplingOverrides};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::state::WebServerState;
use crate::types::{GenerateRequest, ServiceInfo};

pub const GENERATE_PATH: &str = "/api/v1/generate";
pub const HEALTH_PATH: &str = "/health";

const API_KEY_HEADER: &str = "x-api-key";

/// Service information - GET /
pub async fn service_info(State(state): State<WebServerState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "LLM SVG Generator API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generate_endpoint: GENERATE_PATH.to_string(),
        health_endpoint: HEALTH_PATH.to_string(),
        default_provider: state.generator.default_provider().to_string(),
    })
}

/// Health check - GET /health
pub async fn health_check(State(state): State<WebServerState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.uptime_seconds()
    }))
}

/// Generate an icon - POST /api/v1/generate
pub async fn generate_icon(
    State(state): State<WebServerState>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected generate request: {}", rejection.body_text());
        ApiError::bad_request(rejection.body_text())
    })?;

    let request = to_generation_request(body, &headers)?;
    info!(provider = ?request.provider, "Generate request received");

    let result = state.generator.generate(&request).await?;
    Ok(Json(result))
}

/// Build the library request from the HTTP body and headers
pub fn to_generation_request(body: GenerateRequest, headers: &HeaderMap) -> Result<GenerationRequest, ApiError> {
    let mut request = GenerationRequest::new(body.description).with_sampling(SamplingOverrides {
        temperature: body.temperature,
        max_tokens: body.max_tokens,
        top_p: body.top_p,
    });

    if let Some(name) = body.provider.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        let provider = ProviderId::from_str(name).map_err(generator::GeneratorError::from)?;
        request = request.with_provider(provider);
    }
    if let Some(model) = body.model {
        request = request.with_model(model);
    }
    if let Some(credential) = credential_from_headers(headers) {
        request = request.with_credential(credential);
    }
    Ok(request)
}

/// `X-API-Key` first, then `Authorization: Bearer`
pub fn credential_from_headers(headers: &HeaderMap) -> Option<Credential> {
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    if let Some(credential) = Credential::from_optional(api_key) {
        return Some(credential);
    }

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, token) = v.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(token)
        });
    Credential::from_optional(bearer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_credential_header_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        assert_eq!(credential_from_headers(&headers).unwrap().expose(), "from-bearer");

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-api-key"));
        assert_eq!(credential_from_headers(&headers).unwrap().expose(), "from-api-key");
    }

    #[test]
    fn test_credential_rejects_other_schemes_and_blanks() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(credential_from_headers(&headers).is_none());

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("   "));
        assert!(credential_from_headers(&headers).is_none());
    }

    #[test]
    fn test_body_maps_to_generation_request() {
        let body = GenerateRequest {
            description: "a rocket".into(),
            provider: Some("Google".into()),
            model: Some("gemini-1.5-pro".into()),
            temperature: Some(0.2),
            ..Default::default()
        };
        let request = to_generation_request(body, &HeaderMap::new()).unwrap();

        assert_eq!(request.provider, Some(ProviderId::Gemini));
        assert_eq!(request.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(request.sampling.temperature, Some(0.2));
        assert!(request.credential.is_none());
    }

    #[test]
    fn test_unknown_provider_is_bad_request() {
        let body = GenerateRequest {
            description: "a rocket".into(),
            provider: Some("mystery".into()),
            ..Default::default()
        };
        let error = to_generation_request(body, &HeaderMap::new()).unwrap_err();
        assert_eq!(error.status, axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(error.kind, "unknown_provider");
    }
}
