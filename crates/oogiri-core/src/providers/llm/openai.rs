use super::{error_for_status, http_client, LlmClient};
use crate::config::LlmConfig;
use crate::errors::{ConfigError, ProviderError};
use crate::model::LlmResponse;
use crate::providers::network::check_outbound;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIClient {
    pub model: String,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OpenAIClient {
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
            max_tokens: config.max_output_tokens,
            timeout_secs: config.timeout_secs,
            client: http_client(config.timeout_secs)?,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        check_outbound(&url).map_err(|message| ProviderError::Transport { message })?;

        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });
        if let Some(t) = self.temperature {
            body["temperature"] = json!(t);
        }
        if let Some(m) = self.max_tokens {
            body["max_tokens"] = json!(m);
        }

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, Duration::from_secs(self.timeout_secs)))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(error_for_status(status, &error_text));
        }

        let json: serde_json::Value =
            resp.json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    message: format!("failed to decode OpenAI response: {}", e),
                })?;

        // Parse choices[0].message.content
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProviderError::InvalidResponse {
                message: "OpenAI API response missing content".into(),
            })?
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model: self.model.clone(),
            meta: json!({ "usage": json.get("usage") }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> Option<&str> {
        Some(&self.model)
    }
}
