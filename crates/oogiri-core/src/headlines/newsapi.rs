//! NewsAPI `everything` endpoint.
//!
//! Status handling lives here only: 401/403 and API-key error codes map to
//! [`HeadlineError::Auth`], everything else non-2xx to
//! [`HeadlineError::Transport`].

use super::{HeadlineSource, DEFAULT_MAX_HEADLINES};
use crate::config::NewsConfig;
use crate::errors::{ConfigError, HeadlineError};
use crate::model::Headline;
use crate::providers::network::check_outbound;
use crate::providers::{is_auth_status, truncate_body};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use tracing::debug;

/// NewsAPI caps `pageSize` at 100.
const MAX_PAGE_SIZE: usize = 100;

const AUTH_CODES: &[&str] = &[
    "apiKeyMissing",
    "apiKeyInvalid",
    "apiKeyDisabled",
    "apiKeyExhausted",
];

pub struct NewsApiSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    lookback_days: u32,
    timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

impl NewsApiSource {
    pub fn new(config: &NewsConfig, api_key: String) -> Result<Self, ConfigError> {
        Ok(Self {
            client: crate::providers::llm::http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            lookback_days: config.lookback_days,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, ConfigError> {
        Self::new(config, config.resolve_api_key()?)
    }

    fn window(&self, today: NaiveDate) -> (String, String) {
        let from = today - Duration::days(i64::from(self.lookback_days));
        (
            from.format("%Y-%m-%d").to_string(),
            today.format("%Y-%m-%d").to_string(),
        )
    }

    fn transport(&self, err: reqwest::Error) -> HeadlineError {
        if err.is_timeout() {
            HeadlineError::Timeout {
                after: std::time::Duration::from_secs(self.timeout_secs),
            }
        } else {
            HeadlineError::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl HeadlineSource for NewsApiSource {
    async fn fetch(&self, theme: &str, max_count: usize) -> Result<Vec<Headline>, HeadlineError> {
        let url = format!("{}/everything", self.base_url);
        check_outbound(&url).map_err(|message| HeadlineError::Transport { message })?;

        let max_count = if max_count == 0 {
            DEFAULT_MAX_HEADLINES
        } else {
            max_count
        };
        let page_size = max_count.min(MAX_PAGE_SIZE).to_string();
        let (from, to) = self.window(Utc::now().date_naive());
        debug!(theme, from = %from, to = %to, page_size = %page_size, "fetching headlines");

        let resp = self
            .client
            .get(&url)
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", theme),
                ("sortBy", "publishedAt"),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport(e))?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<EverythingResponse>(&body) {
                Ok(parsed) => parsed.message.unwrap_or_else(|| status.to_string()),
                Err(_) => truncate_body(&body),
            };
            return Err(if is_auth_status(status) {
                HeadlineError::Auth { message: detail }
            } else {
                HeadlineError::Transport {
                    message: format!("status {}: {}", status.as_u16(), detail),
                }
            });
        }

        let parsed: EverythingResponse =
            serde_json::from_str(&body).map_err(|e| HeadlineError::Transport {
                message: format!("failed to decode news response: {}", e),
            })?;

        if parsed.status != "ok" {
            let code = parsed.code.unwrap_or_default();
            let message = format!(
                "{}: {}",
                code,
                parsed.message.unwrap_or_else(|| "unknown error".into())
            );
            return Err(if AUTH_CODES.contains(&code.as_str()) {
                HeadlineError::Auth { message }
            } else {
                HeadlineError::Transport { message }
            });
        }

        let headlines: Vec<Headline> = parsed
            .articles
            .into_iter()
            .filter_map(|a| a.title)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && t != "[Removed]")
            .take(max_count)
            .map(Headline::from)
            .collect();

        if headlines.is_empty() {
            return Err(HeadlineError::EmptyResult {
                theme: theme.to_string(),
            });
        }
        debug!(theme, count = headlines.len(), "fetched headlines");
        Ok(headlines)
    }
}
