use super::parse_env;
use anyhow::Result;
use std::env;

/// Articles about the target company that are actually about something
/// else entirely. Matched against the same lower-cased text as the
/// symbol keywords.
const DEFAULT_DISQUALIFYING_KEYWORDS: &[&str] =
    &["obituary", "weather", "sports", "entertainment", "celebrity"];

/// Tunables of the news sentiment aggregator.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    /// Article count at which the volume term of confidence saturates.
    pub article_normalizer: f64,
    /// Dispersion substituted for groups too small to measure agreement.
    pub std_penalty: f64,
    /// Lower-cased keywords that disqualify an article outright.
    pub disqualifying_keywords: Vec<String>,
}

impl SentimentConfig {
    pub fn from_env() -> Result<Self> {
        let article_normalizer: f64 = parse_env("SENTIMENT_ARTICLE_NORMALIZER", 10.0)?;
        if article_normalizer <= 0.0 {
            anyhow::bail!(
                "Invalid SENTIMENT_ARTICLE_NORMALIZER: {} (must be positive)",
                article_normalizer
            );
        }

        let std_penalty = parse_env("SENTIMENT_STD_PENALTY", 0.5)?;

        let disqualifying_keywords = match env::var("SENTIMENT_DISQUALIFYING_KEYWORDS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => default_disqualifying_keywords(),
        };

        Ok(Self {
            article_normalizer,
            std_penalty,
            disqualifying_keywords,
        })
    }
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            article_normalizer: 10.0,
            std_penalty: 0.5,
            disqualifying_keywords: default_disqualifying_keywords(),
        }
    }
}

fn default_disqualifying_keywords() -> Vec<String> {
    DEFAULT_DISQUALIFYING_KEYWORDS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
