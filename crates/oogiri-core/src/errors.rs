//! Error types for the collaborator boundaries.
//!
//! None of these cross the orchestrator: every one of them ends up as the
//! `reason` of a `Failure` value.

use std::time::Duration;

/// Headline retrieval errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeadlineError {
    /// Feed unreachable or returned an unexpected status.
    #[error("news feed transport error: {message}")]
    Transport { message: String },

    /// Feed rejected the credentials.
    #[error("news feed rejected credentials: {message}")]
    Auth { message: String },

    #[error("news feed timed out after {after:?}")]
    Timeout { after: Duration },

    /// Feed answered but had nothing usable for the theme.
    #[error("no headlines found for theme '{theme}'")]
    EmptyResult { theme: String },
}

impl HeadlineError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Auth { .. } => "auth",
            Self::Timeout { .. } => "timeout",
            Self::EmptyResult { .. } => "empty_result",
        }
    }
}

/// Model provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("model provider unreachable: {message}")]
    Transport { message: String },

    #[error("model provider rejected credentials: {message}")]
    Auth { message: String },

    #[error("model provider timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("model provider rate limited: {message}")]
    RateLimited { message: String },

    /// Any other provider-side failure (quota, bad request, service error).
    #[error("model provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// 2xx response whose body lacked the generated text.
    #[error("invalid provider response: {message}")]
    InvalidResponse { message: String },
}

impl ProviderError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Auth { .. } => "auth",
            Self::Timeout { .. } => "timeout",
            Self::RateLimited { .. } => "rate_limited",
            Self::Api { .. } => "api",
            Self::InvalidResponse { .. } => "invalid_response",
        }
    }

    /// Whether a caller-side retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Auth { .. } | Self::InvalidResponse { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { after: timeout }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

/// Failure to turn raw model text into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("model output is not valid JSON: {detail}")]
    MalformedJson { detail: String },

    #[error("model output violates the expected shape: {detail}")]
    SchemaViolation { detail: String },
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson { .. } => "malformed_json",
            Self::SchemaViolation { .. } => "schema_violation",
        }
    }

    pub(crate) fn schema(detail: impl Into<String>) -> Self {
        Self::SchemaViolation {
            detail: detail.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unsupported config version {found} (supported: {supported})")]
    Version { found: u32, supported: u32 },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("missing API key: environment variable {var} is not set")]
    MissingKey { var: String },
}
