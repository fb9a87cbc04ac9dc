//! Drives prompt building, the model call and response parsing for both
//! tasks.
//!
//! Every path ends in a [`GenerationResult`] or [`EvaluationResult`]; no
//! error crosses this boundary and nothing is retried here.

mod run;

use crate::config::OogiriConfig;
use crate::exemplars::ExemplarStore;
use crate::headlines::HeadlineSource;
use crate::model::{
    EvaluationRequest, EvaluationResult, GenerationRequest, GenerationResult, Headline,
};
use crate::providers::llm::LlmClient;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Upper bound on a single model call.
    pub model_timeout: Duration,
    /// Upper bound on a single headline fetch.
    pub headline_timeout: Duration,
    pub max_headlines: usize,
    pub prompt_limit: usize,
    pub evaluation_limit: usize,
    /// Development only.
    pub allow_placeholder_headlines: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model_timeout: Duration::from_secs(60),
            headline_timeout: Duration::from_secs(15),
            max_headlines: crate::headlines::DEFAULT_MAX_HEADLINES,
            prompt_limit: 10,
            evaluation_limit: 3,
            allow_placeholder_headlines: false,
        }
    }
}

impl From<&OogiriConfig> for OrchestratorConfig {
    fn from(cfg: &OogiriConfig) -> Self {
        Self {
            model_timeout: Duration::from_secs(cfg.llm.timeout_secs),
            headline_timeout: Duration::from_secs(cfg.news.timeout_secs),
            max_headlines: cfg.news.max_headlines,
            prompt_limit: cfg.exemplars.prompt_limit,
            evaluation_limit: cfg.exemplars.evaluation_limit,
            allow_placeholder_headlines: cfg.allow_placeholder_headlines,
        }
    }
}

/// Outcome of [`GenerationOrchestrator::generate_for_theme`]. The headlines
/// are the ones the prompt was built from, so the caller can persist them as
/// source context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeGeneration {
    pub headlines: Vec<Headline>,
    /// Set when placeholder headlines stood in for the feed.
    pub placeholder: bool,
    pub result: GenerationResult,
}

#[derive(Clone)]
pub struct GenerationOrchestrator {
    llm: Arc<dyn LlmClient>,
    exemplars: Arc<dyn ExemplarStore>,
    headlines: Option<Arc<dyn HeadlineSource>>,
    config: OrchestratorConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        exemplars: Arc<dyn ExemplarStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            llm,
            exemplars,
            headlines: None,
            config,
        }
    }

    pub fn with_headline_source(mut self, source: Arc<dyn HeadlineSource>) -> Self {
        self.headlines = Some(source);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Generates three prompts for `theme` from caller-supplied headlines,
    /// conditioned on the theme's prompt exemplars when any exist.
    pub async fn generate_prompts(&self, theme: &str, headlines: Vec<Headline>) -> GenerationResult {
        run::generate_prompts_impl(self, theme, headlines).await
    }

    pub async fn generate_from_request(&self, request: &GenerationRequest) -> GenerationResult {
        run::generate_impl(self, request).await
    }

    /// Fetches headlines from the configured source, then generates.
    ///
    /// When the fetch fails and placeholders are not allowed, the result is a
    /// `Failure` and the model is never called.
    pub async fn generate_for_theme(&self, theme: &str) -> ThemeGeneration {
        run::generate_for_theme_impl(self, theme).await
    }

    /// Scores an answer, conditioned on sampled evaluation exemplars.
    pub async fn evaluate_answer(
        &self,
        prompt_text: &str,
        source_context: Option<&str>,
        answer_text: &str,
    ) -> EvaluationResult {
        run::evaluate_answer_impl(self, prompt_text, source_context, answer_text).await
    }

    pub async fn evaluate_request(&self, request: &EvaluationRequest) -> EvaluationResult {
        run::evaluate_impl(self, request).await
    }
}
