//! Helpers shared by the provider clients

use serde_json::{json, Value};
use shared::{Credential, ProviderId, TokenUsage};

use crate::error::{GeneratorError, GeneratorResult, ProviderError};

/// Per-call credential wins over the configured key; neither is an error
pub(crate) fn resolve_credential(
    provider: ProviderId,
    call: Option<&Credential>,
    configured: Option<&Credential>,
) -> GeneratorResult<Credential> {
    call.or(configured)
        .cloned()
        .ok_or(GeneratorError::MissingCredential { provider })
}

/// Per-call model wins over the configured default; blank overrides are ignored
pub(crate) fn resolve_model(call: Option<&str>, default: &str) -> String {
    call.map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// String found at a JSON pointer, or a malformed-response error
pub(crate) fn text_at(provider: ProviderId, json: &Value, pointer: &str) -> Result<String, ProviderError> {
    json.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ProviderError::malformed(provider, format!("no text at {pointer} in response")))
}

pub(crate) fn u64_at(json: &Value, pointer: &str) -> Option<u64> {
    json.pointer(pointer).and_then(Value::as_u64)
}

pub(crate) fn str_at(json: &Value, pointer: &str) -> Option<String> {
    json.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Usage block from provider-specific counters, if the provider reported any
pub(crate) fn usage_value(input: Option<u64>, output: Option<u64>) -> Option<Value> {
    if input.is_none() && output.is_none() {
        return None;
    }
    let usage = TokenUsage {
        input_tokens: input.unwrap_or(0),
        output_tokens: output.unwrap_or(0),
    };
    Some(json!({
        "input_tokens": usage.input_tokens,
        "output_tokens": usage.output_tokens,
        "total_tokens": usage.total(),
    }))
}
