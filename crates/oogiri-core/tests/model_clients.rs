//! Integration tests for the Gemini and OpenAI clients.
//!
//! Uses wiremock for HTTP mocking. Tests cover request shape, text
//! extraction, and status mapping (401/429/5xx/empty candidates).

use oogiri_core::config::LlmConfig;
use oogiri_core::providers::llm::gemini::GeminiClient;
use oogiri_core::providers::llm::openai::OpenAIClient;
use oogiri_core::{LlmClient, ProviderError};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gemini_config(mock_server: &MockServer) -> LlmConfig {
    LlmConfig {
        provider: "gemini".into(),
        model: Some("gemini-2.5-flash".into()),
        base_url: Some(mock_server.uri()),
        timeout_secs: 5,
        max_output_tokens: Some(256),
        ..LlmConfig::default()
    }
}

fn gemini_client(mock_server: &MockServer) -> GeminiClient {
    GeminiClient::new(&gemini_config(mock_server), "test-key".into()).expect("client")
}

#[tokio::test]
async fn test_gemini_concatenates_parts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "sys" }] },
            "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
            "generationConfig": { "maxOutputTokens": 256 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"questions\": " }, { "text": "[\"a\",\"b\",\"c\"]}" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "totalTokenCount": 42 }
        })))
        .mount(&mock_server)
        .await;

    let client = gemini_client(&mock_server);
    let resp = client.complete("sys", "hello").await.expect("complete failed");

    assert_eq!(resp.text, r#"{"questions": ["a","b","c"]}"#);
    assert_eq!(resp.provider, "gemini");
    assert_eq!(resp.model, "gemini-2.5-flash");
}

#[tokio::test]
async fn test_gemini_no_candidates_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&mock_server)
        .await;

    let err = gemini_client(&mock_server)
        .complete("sys", "hello")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "invalid_response");
}

#[tokio::test]
async fn test_gemini_status_mapping() {
    let cases = [
        (400, "api"),
        (401, "auth"),
        (403, "auth"),
        (429, "rate_limited"),
        (503, "api"),
    ];

    for (status, kind) in cases {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": "provider says no" }
            })))
            .mount(&mock_server)
            .await;

        let err = gemini_client(&mock_server)
            .complete("sys", "hello")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind, "status {}", status);
        assert!(err.to_string().contains("provider says no"));
    }
}

#[tokio::test]
async fn test_gemini_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [] }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let cfg = LlmConfig {
        timeout_secs: 1,
        ..gemini_config(&mock_server)
    };
    let client = GeminiClient::new(&cfg, "test-key".into()).unwrap();
    let err = client.complete("sys", "hello").await.unwrap_err();
    assert_eq!(err, ProviderError::Timeout {
            after: Duration::from_secs(1)
        });
}

#[tokio::test]
async fn test_openai_chat_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "hello" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "{\"score\": 3, \"comment\": \"まずまず\"}" } }],
            "usage": { "total_tokens": 12 }
        })))
        .mount(&mock_server)
        .await;

    let cfg = LlmConfig {
        provider: "openai".into(),
        base_url: Some(mock_server.uri()),
        ..LlmConfig::default()
    };
    let client = OpenAIClient::new(&cfg, "test-key".into()).unwrap();
    let resp = client.complete("sys", "hello").await.expect("complete failed");
    assert!(resp.text.contains("まずまず"));
    assert_eq!(resp.provider, "openai");
}

#[tokio::test]
async fn test_openai_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&mock_server)
        .await;

    let cfg = LlmConfig {
        provider: "openai".into(),
        base_url: Some(mock_server.uri()),
        ..LlmConfig::default()
    };
    let client = OpenAIClient::new(&cfg, "test-key".into()).unwrap();
    let err = client.complete("sys", "hello").await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(err, ProviderError::RateLimited { .. }));
}
