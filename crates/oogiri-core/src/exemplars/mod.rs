//! Curated historical records used for Few-Shot conditioning.

pub mod schema;
pub mod sqlite;

pub use sqlite::{QuestionRow, SqliteExemplarStore};

use crate::model::EvaluationExemplar;

/// Read side of the exemplar corpus.
///
/// Both operations fail soft: on any retrieval error they log and return an
/// empty sequence, which degrades the caller to zero-shot prompting.
pub trait ExemplarStore: Send + Sync {
    /// Quality-flagged prompts for `theme`, newest first, at most `limit`.
    fn top_prompt_exemplars(&self, theme: &str, limit: usize) -> Vec<String>;

    /// Quality-flagged scored answers in no particular order, at most `limit`.
    fn sample_evaluation_exemplars(&self, limit: usize) -> Vec<EvaluationExemplar>;
}

/// Zero-shot store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExemplars;

impl ExemplarStore for NoExemplars {
    fn top_prompt_exemplars(&self, _theme: &str, _limit: usize) -> Vec<String> {
        Vec::new()
    }

    fn sample_evaluation_exemplars(&self, _limit: usize) -> Vec<EvaluationExemplar> {
        Vec::new()
    }
}
