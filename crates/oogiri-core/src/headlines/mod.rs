//! Recent topical headlines for a theme.

pub mod newsapi;

pub use newsapi::NewsApiSource;

use crate::errors::HeadlineError;
use crate::model::Headline;
use async_trait::async_trait;

pub const DEFAULT_MAX_HEADLINES: usize = 100;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Retrieval of recent headlines. Implementations fail with
/// [`HeadlineError::EmptyResult`] rather than return an empty list.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    async fn fetch(&self, theme: &str, max_count: usize) -> Result<Vec<Headline>, HeadlineError>;
}

/// A fixed list, mostly for callers that already have headlines and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHeadlines {
    headlines: Vec<Headline>,
}

impl StaticHeadlines {
    pub fn new(headlines: Vec<Headline>) -> Self {
        Self { headlines }
    }
}

#[async_trait]
impl HeadlineSource for StaticHeadlines {
    async fn fetch(&self, theme: &str, max_count: usize) -> Result<Vec<Headline>, HeadlineError> {
        if self.headlines.is_empty() {
            return Err(HeadlineError::EmptyResult {
                theme: theme.to_string(),
            });
        }
        Ok(self.headlines.iter().take(max_count).cloned().collect())
    }
}

/// Deterministic stand-in headlines for development when the feed is
/// unavailable. Never used unless explicitly allowed by config.
pub fn placeholder_headlines(theme: &str) -> Vec<Headline> {
    [
        "ダミー1: AIが生成したタイトルがトレンドに",
        "ダミー2: 政治家の猫ミームが話題沸騰",
        "ダミー3: スポーツ選手が新しい料理に挑戦",
        "ダミー4: アニメ映画が記録的な興行収入を達成",
    ]
    .iter()
    .map(|tail| Headline::new(format!("{}関連のニュースタイトル - {}", theme, tail)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_deterministic_and_theme_scoped() {
        let a = placeholder_headlines("芸能");
        assert_eq!(a, placeholder_headlines("芸能"));
        assert_eq!(a.len(), 4);
        assert!(a.iter().all(|h| h.as_str().starts_with("芸能関連のニュースタイトル")));
    }

    #[tokio::test]
    async fn static_source_bounds_and_empty() {
        let src = StaticHeadlines::new(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(src.fetch("t", 2).await.unwrap().len(), 2);

        let err = StaticHeadlines::default().fetch("t", 5).await.unwrap_err();
        assert_eq!(err, HeadlineError::EmptyResult { theme: "t".into() });
    }
}
