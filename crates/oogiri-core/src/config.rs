//! YAML configuration with environment overrides.
//!
//! API keys are never read from the file; each section names the environment
//! variable that holds its key.
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `OOGIRI_LLM_PROVIDER` | `llm.provider` |
//! | `OOGIRI_LLM_MODEL` | `llm.model` |
//! | `OOGIRI_LLM_URL` | `llm.base_url` |
//! | `OOGIRI_NEWS_URL` | `news.base_url` |
//! | `OOGIRI_DB` | `exemplars.database` |
//! | `OOGIRI_ALLOW_PLACEHOLDER_HEADLINES` | `allow_placeholder_headlines` |

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_PATH: &str = "oogiri.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OogiriConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Themes offered to users.
    #[serde(default = "default_themes")]
    pub themes: Vec<String>,

    /// Substitute placeholder headlines when the feed fails. Development only.
    #[serde(default)]
    pub allow_placeholder_headlines: bool,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub exemplars: ExemplarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `gemini`, `openai` or `fake`.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name. Defaults per provider, see [`LlmConfig::model_name`].
    #[serde(default)]
    pub model: Option<String>,

    /// Overrides the provider's API base URL.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Environment variable holding the API key. Defaults per provider.
    #[serde(default)]
    pub api_key_env: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub temperature: Option<f32>,

    #[serde(default)]
    pub max_output_tokens: Option<u32>,

    /// Canned response for the `fake` provider.
    #[serde(default)]
    pub fake_response: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    #[serde(default = "default_news_url")]
    pub base_url: String,

    #[serde(default = "default_news_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    #[serde(default = "default_max_headlines")]
    pub max_headlines: usize,

    #[serde(default = "default_news_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExemplarConfig {
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// Prompt exemplars per generation call.
    #[serde(default = "default_prompt_limit")]
    pub prompt_limit: usize,

    /// Scored answers per evaluation call.
    #[serde(default = "default_evaluation_limit")]
    pub evaluation_limit: usize,
}

fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

fn default_themes() -> Vec<String> {
    ["政治", "芸能", "スポーツ", "アニメ"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_news_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_news_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

fn default_lookback_days() -> u32 {
    30
}

fn default_max_headlines() -> usize {
    100
}

fn default_news_timeout() -> u64 {
    15
}

fn default_database() -> PathBuf {
    PathBuf::from("oogiri.db")
}

fn default_prompt_limit() -> usize {
    10
}

fn default_evaluation_limit() -> usize {
    3
}

impl Default for OogiriConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            themes: default_themes(),
            allow_placeholder_headlines: false,
            llm: LlmConfig::default(),
            news: NewsConfig::default(),
            exemplars: ExemplarConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            api_key_env: None,
            timeout_secs: default_llm_timeout(),
            temperature: None,
            max_output_tokens: None,
            fake_response: None,
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: default_news_url(),
            api_key_env: default_news_key_env(),
            lookback_days: default_lookback_days(),
            max_headlines: default_max_headlines(),
            timeout_secs: default_news_timeout(),
        }
    }
}

impl Default for ExemplarConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            prompt_limit: default_prompt_limit(),
            evaluation_limit: default_evaluation_limit(),
        }
    }
}

impl LlmConfig {
    pub fn model_name(&self) -> &str {
        match (&self.model, self.provider.as_str()) {
            (Some(model), _) => model,
            (None, "openai") => "gpt-4o-mini",
            (None, "fake") => "fake",
            (None, _) => "gemini-2.5-flash",
        }
    }

    pub fn api_key_var(&self) -> &str {
        match (&self.api_key_env, self.provider.as_str()) {
            (Some(var), _) => var,
            (None, "openai") => "OPENAI_API_KEY",
            (None, _) => "GEMINI_API_KEY",
        }
    }

    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        resolve_key(self.api_key_var())
    }
}

impl NewsConfig {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        resolve_key(&self.api_key_env)
    }
}

fn resolve_key(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingKey {
            var: var.to_string(),
        }),
    }
}

impl OogiriConfig {
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::Version {
                found: self.version,
                supported: SUPPORTED_CONFIG_VERSION,
            });
        }
        if self.llm.timeout_secs == 0 || self.news.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        if self.news.max_headlines == 0 {
            return Err(ConfigError::Invalid("news.max_headlines must be at least 1".into()));
        }
        if self.themes.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("themes must not contain empty entries".into()));
        }
        Ok(())
    }

    /// Applies `OOGIRI_*` overrides on top of file values.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("OOGIRI_LLM_PROVIDER") {
            self.llm.provider = v;
        }
        if let Ok(v) = std::env::var("OOGIRI_LLM_MODEL") {
            self.llm.model = Some(v);
        }
        if let Ok(v) = std::env::var("OOGIRI_LLM_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("OOGIRI_NEWS_URL") {
            self.news.base_url = v;
        }
        if let Ok(v) = std::env::var("OOGIRI_DB") {
            self.exemplars.database = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("OOGIRI_ALLOW_PLACEHOLDER_HEADLINES") {
            self.allow_placeholder_headlines = v == "1" || v.eq_ignore_ascii_case("true");
        }
    }
}

/// Reads, validates and env-overlays the config at `path`. A missing file
/// yields defaults.
pub fn load_config(path: &Path) -> Result<OogiriConfig, ConfigError> {
    let mut cfg = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        OogiriConfig::from_yaml(&raw)?
    } else {
        OogiriConfig::default()
    };
    cfg.apply_env();
    cfg.validate()?;
    Ok(cfg)
}

pub const SAMPLE_CONFIG: &str = r#"version: 1

# Themes offered to users.
themes: [政治, 芸能, スポーツ, アニメ]

# Development only: fall back to placeholder headlines when the news feed fails.
allow_placeholder_headlines: false

llm:
  provider: gemini          # gemini | openai | fake
  model: gemini-2.5-flash
  api_key_env: GEMINI_API_KEY
  timeout_secs: 60

news:
  base_url: https://newsapi.org/v2
  api_key_env: NEWS_API_KEY
  lookback_days: 30
  max_headlines: 100
  timeout_secs: 15

exemplars:
  database: oogiri.db
  prompt_limit: 10
  evaluation_limit: 3
"#;

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn sample_config_parses_to_defaults() {
        let cfg = OogiriConfig::from_yaml(SAMPLE_CONFIG).unwrap();
        assert_eq!(cfg.themes, default_themes());
        assert_eq!(cfg.llm.provider, "gemini");
        assert_eq!(cfg.llm.model_name(), "gemini-2.5-flash");
        assert_eq!(cfg.news.lookback_days, 30);
        assert_eq!(cfg.news.max_headlines, 100);
        assert_eq!(cfg.exemplars.prompt_limit, 10);
        assert_eq!(cfg.exemplars.evaluation_limit, 3);
        assert!(!cfg.allow_placeholder_headlines);
    }

    #[test]
    fn minimal_config_fills_defaults() {
        let cfg = OogiriConfig::from_yaml("version: 1\nllm:\n  provider: openai\n").unwrap();
        assert_eq!(cfg.llm.provider, "openai");
        assert_eq!(cfg.llm.api_key_var(), "OPENAI_API_KEY");
        assert_eq!(cfg.llm.model_name(), "gpt-4o-mini");
        assert_eq!(cfg.news.api_key_env, "NEWS_API_KEY");
    }

    #[test]
    fn explicit_model_wins_over_provider_default() {
        let raw = "version: 1\nllm:\n  provider: openai\n  model: gpt-4.1\n";
        let cfg = OogiriConfig::from_yaml(raw).unwrap();
        assert_eq!(cfg.llm.model_name(), "gpt-4.1");
        assert_eq!(OogiriConfig::default().llm.model_name(), "gemini-2.5-flash");
    }

    #[test]
    fn rejects_unknown_version() {
        let err = OogiriConfig::from_yaml("version: 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Version { found: 2, .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = OogiriConfig::from_yaml("version: 1\nllm:\n  timeout_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    #[serial]
    fn env_overrides_file_values() {
        std::env::set_var("OOGIRI_LLM_PROVIDER", "fake");
        std::env::set_var("OOGIRI_ALLOW_PLACEHOLDER_HEADLINES", "true");
        let mut cfg = OogiriConfig::default();
        cfg.apply_env();
        std::env::remove_var("OOGIRI_LLM_PROVIDER");
        std::env::remove_var("OOGIRI_ALLOW_PLACEHOLDER_HEADLINES");
        assert_eq!(cfg.llm.provider, "fake");
        assert!(cfg.allow_placeholder_headlines);
    }

    #[test]
    #[serial]
    fn env_provider_switch_follows_model_default() {
        std::env::remove_var("OOGIRI_LLM_MODEL");
        std::env::set_var("OOGIRI_LLM_PROVIDER", "openai");
        let mut cfg = OogiriConfig::default();
        cfg.apply_env();
        std::env::remove_var("OOGIRI_LLM_PROVIDER");
        assert_eq!(cfg.llm.model_name(), "gpt-4o-mini");
    }

    #[test]
    #[serial]
    fn missing_key_names_the_variable() {
        std::env::remove_var("OOGIRI_TEST_MISSING_KEY");
        let cfg = LlmConfig {
            api_key_env: Some("OOGIRI_TEST_MISSING_KEY".into()),
            ..LlmConfig::default()
        };
        let err = cfg.resolve_api_key().unwrap_err();
        assert!(err.to_string().contains("OOGIRI_TEST_MISSING_KEY"));
    }

    #[test]
    #[serial]
    fn load_config_without_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = load_config(&tmp.path().join("absent.yaml")).unwrap();
        assert_eq!(cfg.version, SUPPORTED_CONFIG_VERSION);
    }

    #[test]
    fn write_then_load_sample() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("oogiri.yaml");
        write_sample_config(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("provider: gemini"));
        assert!(OogiriConfig::from_yaml(&raw).is_ok());
    }

    #[test]
    fn write_failure_is_reported_as_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing-dir").join("oogiri.yaml");
        let err = write_sample_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }));
        assert!(err.to_string().starts_with("failed to write config"));
    }
}
