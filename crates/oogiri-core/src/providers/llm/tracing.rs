use crate::errors::ProviderError;
use crate::model::LlmResponse;
use crate::providers::llm::LlmClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Records one span per model call. Prompt text is never captured.
pub struct TracingLlmClient {
    inner: Arc<dyn LlmClient>,
}

impl TracingLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl LlmClient for TracingLlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<LlmResponse, ProviderError> {
        let span = info_span!(
            "llm.complete",
            "llm.provider" = self.inner.provider_name(),
            "llm.model" = tracing::field::Empty,
            "llm.prompt_chars" = system.chars().count() + user.chars().count(),
            "llm.response_chars" = tracing::field::Empty,
            "llm.duration_ms" = tracing::field::Empty,
            "error" = tracing::field::Empty,
            "error.kind" = tracing::field::Empty,
            "error.message" = tracing::field::Empty
        );

        async move {
            let start = std::time::Instant::now();
            let result = self.inner.complete(system, user).await;

            let span = tracing::Span::current();
            span.record("llm.duration_ms", start.elapsed().as_millis() as u64);

            match &result {
                Ok(resp) => {
                    span.record("llm.model", resp.model.as_str());
                    span.record("llm.response_chars", resp.text.chars().count());
                }
                Err(e) => {
                    span.record("error", true);
                    span.record("error.kind", e.kind());
                    span.record("error.message", e.to_string().as_str());
                    tracing::warn!(error = %e, "model call failed");
                }
            }

            result
        }
        .instrument(span)
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }

    fn model_name(&self) -> Option<&str> {
        self.inner.model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::llm::fake::FakeClient;

    #[tokio::test]
    async fn passes_through_response_and_identity() {
        let inner = Arc::new(FakeClient::new("fake-1".to_string()).with_response("ok".into()));
        let client = TracingLlmClient::new(inner);
        let res = client.complete("sys", "user").await.unwrap();
        assert_eq!(res.text, "ok");
        assert_eq!(client.provider_name(), "fake");
        assert_eq!(client.model_name(), Some("fake-1"));
    }
}
