//! Humor-prompt ("oogiri") orchestration.
//!
//! This crate turns recent news headlines and curated exemplars into model
//! prompts, calls a generative-text provider and validates its free-text
//! reply into typed results:
//!
//! - three prompts for a theme ([`GenerationResult`])
//! - a score and comment for an answer ([`EvaluationResult`])
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use oogiri_core::{
//!     build_llm_client, GenerationOrchestrator, GenerationResult, NoExemplars, OogiriConfig,
//!     OrchestratorConfig,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cfg = OogiriConfig::default();
//! let llm = build_llm_client(&cfg.llm)?;
//! let orch = GenerationOrchestrator::new(llm, Arc::new(NoExemplars), OrchestratorConfig::from(&cfg));
//!
//! match orch.generate_prompts("スポーツ", vec!["選手が新記録を達成".into()]).await {
//!     GenerationResult::Success { questions } => {
//!         for q in &questions {
//!             println!("{}", q);
//!         }
//!     }
//!     GenerationResult::Failure { reason } => eprintln!("{}", reason),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`config`] for the YAML layout and `OOGIRI_*` overrides. API keys are
//! read from the environment variables the config names.

pub mod config;
pub mod errors;
pub mod exemplars;
pub mod headlines;
pub mod model;
pub mod orchestrator;
pub mod parse;
pub mod prompt;
pub mod providers;

pub use config::{load_config, OogiriConfig};
pub use errors::{ConfigError, HeadlineError, ParseError, ProviderError};
pub use exemplars::{ExemplarStore, NoExemplars, SqliteExemplarStore};
pub use headlines::{placeholder_headlines, HeadlineSource, NewsApiSource};
pub use model::{
    source_context_for, Evaluation, EvaluationExemplar, EvaluationRequest, EvaluationResult,
    GenerationRequest, GenerationResult, Headline, QuestionSet,
};
pub use orchestrator::{GenerationOrchestrator, OrchestratorConfig, ThemeGeneration};
pub use providers::llm::{build_llm_client, LlmClient};
