//! Per-call data carried through the orchestrator.
//!
//! Everything here is created for a single generation or evaluation call and
//! dropped afterwards; persistence is the caller's decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of prompts a successful generation yields.
pub const QUESTION_COUNT: usize = 3;

/// Title of a single news item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headline(String);

impl Headline {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Headline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Headline {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Headline {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A prior answer with its score and commentary, used as a Few-Shot example
/// for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationExemplar {
    pub prompt: String,
    pub answer: String,
    pub score: i64,
    pub commentary: String,
}

/// Input to prompt generation. Fields are private so a built request cannot
/// be mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    theme: String,
    headlines: Vec<Headline>,
    exemplars: Vec<String>,
}

impl GenerationRequest {
    /// Fails when the theme is empty or whitespace.
    pub fn new(
        theme: impl Into<String>,
        headlines: Vec<Headline>,
        exemplars: Vec<String>,
    ) -> Result<Self, RequestError> {
        let theme = theme.into();
        if theme.trim().is_empty() {
            return Err(RequestError::EmptyTheme);
        }
        Ok(Self {
            theme,
            headlines,
            exemplars,
        })
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn headlines(&self) -> &[Headline] {
        &self.headlines
    }

    pub fn exemplars(&self) -> &[String] {
        &self.exemplars
    }
}

/// Input to answer evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    prompt_text: String,
    source_context: Option<String>,
    answer_text: String,
    exemplars: Vec<EvaluationExemplar>,
}

impl EvaluationRequest {
    pub fn new(
        prompt_text: impl Into<String>,
        source_context: Option<String>,
        answer_text: impl Into<String>,
        exemplars: Vec<EvaluationExemplar>,
    ) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            source_context,
            answer_text: answer_text.into(),
            exemplars,
        }
    }

    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    pub fn source_context(&self) -> Option<&str> {
        self.source_context.as_deref()
    }

    pub fn answer_text(&self) -> &str {
        &self.answer_text
    }

    pub fn exemplars(&self) -> &[EvaluationExemplar] {
        &self.exemplars
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("theme must not be empty")]
    EmptyTheme,
}

/// Exactly three non-empty prompts. Only the response parser constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuestionSet([String; QUESTION_COUNT]);

impl QuestionSet {
    pub(crate) fn from_array(questions: [String; QUESTION_COUNT]) -> Self {
        Self(questions)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0.into()
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Score in `[1, 5]` plus the judge's comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub score: u8,
    pub comment: String,
}

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { questions: QuestionSet },
    Failure { reason: String },
}

impl GenerationResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn questions(&self) -> Option<&QuestionSet> {
        match self {
            Self::Success { questions } => Some(questions),
            Self::Failure { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationResult {
    Success { score: u8, comment: String },
    Failure { reason: String },
}

impl EvaluationResult {
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Evaluation> for EvaluationResult {
    fn from(value: Evaluation) -> Self {
        Self::Success {
            score: value.score,
            comment: value.comment,
        }
    }
}

/// Text returned by a model provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// Joins headlines into the source context stored alongside generated
/// questions.
pub fn source_context_for(headlines: &[Headline]) -> String {
    headlines
        .iter()
        .map(Headline::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
