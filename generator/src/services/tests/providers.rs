//! Tests for the provider clients against a mocked transport

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use shared::{Credential, ProviderId, SamplingOverrides, SamplingParams};

use super::test_config;
use crate::error::{GeneratorError, ProviderError, ProviderErrorKind};
use crate::services::{AnthropicClient, GeminiClient, OllamaClient, OpenAiClient};
use crate::traits::{LlmClient, MockHttpTransport};
use crate::types::{CompletionRequest, OutboundRequest};

type Captured = Arc<Mutex<Vec<OutboundRequest>>>;

/// Transport expecting exactly one call, replying with `reply` and recording the request
fn capturing_transport(reply: Value) -> (Arc<MockHttpTransport>, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    let mut transport = MockHttpTransport::new();
    transport.expect_post_json().times(1).returning(move |request| {
        sink.lock().unwrap().push(request);
        Ok(reply.clone())
    });

    (Arc::new(transport), captured)
}

fn silent_transport() -> Arc<MockHttpTransport> {
    let mut transport = MockHttpTransport::new();
    transport.expect_post_json().times(0);
    Arc::new(transport)
}

fn completion(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        prompt: prompt.to_string(),
        ..Default::default()
    }
}

fn only_request(captured: &Captured) -> OutboundRequest {
    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one provider call");
    requests[0].clone()
}

#[tokio::test]
async fn test_openai_request_shape() {
    let (transport, captured) = capturing_transport(json!({
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{"message": {"role": "assistant", "content": "<svg></svg>"}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40}
    }));
    let client = OpenAiClient::new(
        test_config(ProviderId::OpenAI, Some("sk-test")),
        SamplingParams::default(),
        transport,
    );

    let raw = client.generate(&completion("draw a rocket")).await.unwrap();

    assert_eq!(raw.text, "<svg></svg>");
    assert_eq!(raw.model, "gpt-4o-mini-2024-07-18");
    assert_eq!(raw.metadata["finish_reason"], "stop");
    assert_eq!(raw.metadata["usage"]["total_tokens"], 160);

    let request = only_request(&captured);
    assert_eq!(request.provider, ProviderId::OpenAI);
    assert_eq!(request.url, "http://llm.test/v1/chat/completions");
    assert_eq!(request.header("Authorization"), Some("Bearer sk-test"));
    assert_eq!(
        request.body,
        json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "draw a rocket"}],
            "temperature": 0.7,
            "max_tokens": 1000,
            "top_p": 0.9
        })
    );
}

#[tokio::test]
async fn test_anthropic_request_shape() {
    let (transport, captured) = capturing_transport(json!({
        "model": "claude-3-5-sonnet-20241022",
        "content": [{"type": "text", "text": "<svg/>"}],
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 5}
    }));
    let client = AnthropicClient::new(
        test_config(ProviderId::Anthropic, Some("ak-test")),
        SamplingParams::default(),
        transport,
    );

    let raw = client.generate(&completion("a cat")).await.unwrap();
    assert_eq!(raw.text, "<svg/>");
    assert_eq!(raw.metadata["stop_reason"], "end_turn");

    let request = only_request(&captured);
    assert_eq!(request.url, "http://llm.test/v1/messages");
    assert_eq!(request.header("x-api-key"), Some("ak-test"));
    assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
    assert!(request.header("Authorization").is_none());
    assert_eq!(request.body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(request.body["max_tokens"], 1000);
    assert_eq!(request.body["messages"][0]["content"], "a cat");
}

#[tokio::test]
async fn test_gemini_request_shape() {
    let (transport, captured) = capturing_transport(json!({
        "candidates": [{"content": {"parts": [{"text": "<svg/>"}]}, "finishReason": "STOP"}],
        "modelVersion": "gemini-1.5-flash-002"
    }));
    let client = GeminiClient::new(
        test_config(ProviderId::Gemini, Some("g-test")),
        SamplingParams::default(),
        transport,
    );

    let raw = client.generate(&completion("a tree")).await.unwrap();
    assert_eq!(raw.model, "gemini-1.5-flash-002");
    assert!(!raw.metadata.contains_key("usage"));

    let request = only_request(&captured);
    assert_eq!(
        request.url,
        "http://llm.test/v1beta/models/gemini-1.5-flash:generateContent"
    );
    assert_eq!(request.header("x-goog-api-key"), Some("g-test"));
    assert!(!request.url.contains("g-test"));
    assert_eq!(request.body["contents"][0]["parts"][0]["text"], "a tree");
    assert_eq!(request.body["generationConfig"]["maxOutputTokens"], 1000);
    assert_eq!(request.body["generationConfig"]["topP"], 0.9);
}

#[tokio::test]
async fn test_ollama_request_shape_without_credential() {
    let (transport, captured) = capturing_transport(json!({
        "model": "llama3.2",
        "response": "<svg/>",
        "done": true,
        "eval_count": 42,
        "total_duration": 123456
    }));
    let client = OllamaClient::new(test_config(ProviderId::Ollama, None), SamplingParams::default(), transport);

    let raw = client.generate(&completion("a house")).await.unwrap();
    assert_eq!(raw.text, "<svg/>");
    assert_eq!(raw.metadata["eval_count"], 42);

    let request = only_request(&captured);
    assert_eq!(request.url, "http://llm.test/api/generate");
    assert!(request.header("Authorization").is_none());
    assert_eq!(
        request.body,
        json!({
            "model": "llama3.2",
            "prompt": "a house",
            "stream": false,
            "options": {"temperature": 0.7, "num_predict": 1000, "top_p": 0.9}
        })
    );
}

#[tokio::test]
async fn test_ollama_sends_bearer_when_credential_given() {
    let (transport, captured) = capturing_transport(json!({"response": "<svg/>"}));
    let client = OllamaClient::new(test_config(ProviderId::Ollama, None), SamplingParams::default(), transport);

    let request = CompletionRequest {
        credential: Some(Credential::new("proxy-token")),
        ..completion("a house")
    };
    let raw = client.generate(&request).await.unwrap();

    // No echo in the reply, so the resolved model is reported
    assert_eq!(raw.model, "llama3.2");
    assert_eq!(only_request(&captured).header("Authorization"), Some("Bearer proxy-token"));
}

#[tokio::test]
async fn test_sampling_overrides_applied_per_call() {
    let (transport, captured) = capturing_transport(json!({
        "choices": [{"message": {"content": "<svg/>"}}]
    }));
    let client = OpenAiClient::new(
        test_config(ProviderId::OpenAI, Some("sk-test")),
        SamplingParams::default(),
        transport,
    );

    let request = CompletionRequest {
        sampling: SamplingOverrides {
            temperature: Some(0.2),
            ..Default::default()
        },
        ..completion("a rocket")
    };
    client.generate(&request).await.unwrap();

    let body = only_request(&captured).body;
    assert_eq!(body["temperature"], 0.2);
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["top_p"], 0.9);
}

#[tokio::test]
async fn test_call_credential_and_model_override_configuration() {
    let (transport, captured) = capturing_transport(json!({
        "content": [{"text": "<svg/>"}]
    }));
    let client = AnthropicClient::new(
        test_config(ProviderId::Anthropic, Some("configured-key")),
        SamplingParams::default(),
        transport,
    );

    let request = CompletionRequest {
        credential: Some(Credential::new("caller-key")),
        model: Some("claude-3-haiku-20240307".to_string()),
        ..completion("a cat")
    };
    let raw = client.generate(&request).await.unwrap();

    assert_eq!(raw.model, "claude-3-haiku-20240307");
    let sent = only_request(&captured);
    assert_eq!(sent.header("x-api-key"), Some("caller-key"));
    assert_eq!(sent.body["model"], "claude-3-haiku-20240307");
}

#[tokio::test]
async fn test_missing_credential_makes_no_call() {
    for provider in [ProviderId::OpenAI, ProviderId::Anthropic, ProviderId::Gemini] {
        let transport = silent_transport();
        let config = test_config(provider, None);
        let sampling = SamplingParams::default();
        let client: Box<dyn LlmClient> = match provider {
            ProviderId::OpenAI => Box::new(OpenAiClient::new(config, sampling, transport)),
            ProviderId::Anthropic => Box::new(AnthropicClient::new(config, sampling, transport)),
            _ => Box::new(GeminiClient::new(config, sampling, transport)),
        };

        let error = client.generate(&completion("anything")).await.unwrap_err();
        assert_eq!(error, GeneratorError::MissingCredential { provider });
    }
}

#[tokio::test]
async fn test_unexpected_shape_is_malformed_response() {
    let (transport, _) = capturing_transport(json!({"error": {"message": "quota"}}));
    let client = GeminiClient::new(
        test_config(ProviderId::Gemini, Some("g-test")),
        SamplingParams::default(),
        transport,
    );

    match client.generate(&completion("a tree")).await {
        Err(GeneratorError::Provider(error)) => {
            assert_eq!(error.provider, ProviderId::Gemini);
            assert_eq!(error.kind, ProviderErrorKind::MalformedResponse);
        }
        other => panic!("expected malformed response, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_passes_through() {
    let mut transport = MockHttpTransport::new();
    transport
        .expect_post_json()
        .times(1)
        .returning(|_| Err(ProviderError::timeout(ProviderId::OpenAI, "request timed out after 5s")));
    let client = OpenAiClient::new(
        test_config(ProviderId::OpenAI, Some("sk-test")),
        SamplingParams::default(),
        Arc::new(transport),
    );

    let error = client.generate(&completion("a rocket")).await.unwrap_err();
    assert_eq!(
        error,
        GeneratorError::Provider(ProviderError::timeout(ProviderId::OpenAI, "request timed out after 5s"))
    );
}

#[test]
fn test_clients_report_identity() {
    let transport = silent_transport();
    let sampling = SamplingParams::default();

    let openai = OpenAiClient::new(test_config(ProviderId::OpenAI, None), sampling, transport.clone());
    let ollama = OllamaClient::new(test_config(ProviderId::Ollama, None), sampling, transport);

    assert_eq!(openai.provider(), ProviderId::OpenAI);
    assert_eq!(openai.default_model(), "gpt-4o-mini");
    assert_eq!(ollama.provider(), ProviderId::Ollama);
    assert_eq!(ollama.default_model(), "llama3.2");
}
