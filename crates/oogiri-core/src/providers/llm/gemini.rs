//! Gemini `generateContent` client.

use super::{error_for_status, http_client, LlmClient};
use crate::config::LlmConfig;
use crate::errors::{ConfigError, ProviderError};
use crate::model::LlmResponse;
use crate::providers::network::check_outbound;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, ConfigError> {
        Ok(Self {
            model: config.model_name().to_string(),
            api_key,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout_secs: config.timeout_secs,
            client: http_client(config.timeout_secs)?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let url = self.endpoint();
        check_outbound(&url).map_err(|message| ProviderError::Transport { message })?;

        let mut generation_config = serde_json::Map::new();
        if let Some(t) = self.temperature {
            generation_config.insert("temperature".into(), json!(t));
        }
        if let Some(m) = self.max_output_tokens {
            generation_config.insert("maxOutputTokens".into(), json!(m));
        }

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![TextPart { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![TextPart { text: user }],
            }],
            generation_config: (!generation_config.is_empty())
                .then(|| serde_json::Value::Object(generation_config)),
        };

        debug!(model = %self.model, "sending gemini generateContent request");
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, Duration::from_secs(self.timeout_secs)))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, &error_message(&text)));
        }

        let parsed: GenerateResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    after: Duration::from_secs(self.timeout_secs),
                }
            } else {
                ProviderError::InvalidResponse {
                    message: format!("failed to decode gemini response: {}", e),
                }
            }
        })?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse {
                message: "gemini response has no candidates".into(),
            })?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(ProviderError::InvalidResponse {
                message: format!(
                    "gemini candidate has no text (finishReason={})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            });
        }

        Ok(LlmResponse {
            text,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            meta: json!({ "usage": parsed.usage_metadata }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> Option<&str> {
        Some(&self.model)
    }
}

/// Gemini errors arrive as `{"error": {"message": ...}}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
