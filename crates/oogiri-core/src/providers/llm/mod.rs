pub mod fake;
pub mod gemini;
pub mod openai;
pub mod tracing;

use crate::config::LlmConfig;
use crate::errors::{ConfigError, ProviderError};
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound generative-model capability.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> Option<&str> {
        None
    }
}

/// Builds the configured provider wrapped in [`tracing::TracingLlmClient`].
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, ConfigError> {
    let inner: Arc<dyn LlmClient> = match config.provider.as_str() {
        "gemini" => {
            let key = config.resolve_api_key()?;
            Arc::new(gemini::GeminiClient::new(config, key)?)
        }
        "openai" => {
            let key = config.resolve_api_key()?;
            Arc::new(openai::OpenAIClient::new(config, key)?)
        }
        "fake" => {
            let client = fake::FakeClient::new(config.model_name().to_string());
            match &config.fake_response {
                Some(resp) => Arc::new(client.with_response(resp.clone())),
                None => Arc::new(client),
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "unknown llm provider '{}' (expected gemini, openai or fake)",
                other
            )))
        }
    };
    Ok(Arc::new(tracing::TracingLlmClient::new(inner)))
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(concat!("oogiri/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ConfigError::Invalid(format!("failed to create HTTP client: {}", e)))
}

/// Maps a non-2xx provider response to a [`ProviderError`].
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    let message = super::truncate_body(body);
    if super::is_auth_status(status) {
        ProviderError::Auth { message }
    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited { message }
    } else {
        ProviderError::Api {
            status: status.as_u16(),
            message,
        }
    }
}
