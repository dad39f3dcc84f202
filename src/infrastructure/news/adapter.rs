//! Provider payload adapters.
//!
//! NewsAPI and Alpha Vantage ship articles in different shapes: field
//! names, timestamp formats and whether sentiment comes pre-computed.
//! Everything is normalized into [`Article`] here so the aggregator
//! never branches on source identity.

use crate::domain::article::Article;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
pub struct NewsApiArticle {
    pub source: NewsApiSource,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsApiSource {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AlphaVantageResponse {
    #[serde(default)]
    pub feed: Vec<AlphaVantageFeedItem>,
}

#[derive(Debug, Deserialize)]
pub struct AlphaVantageFeedItem {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    pub url: Option<String>,
    pub time_published: String,
    pub overall_sentiment_score: Option<NumberOrText>,
    pub overall_sentiment_label: Option<String>,
    #[serde(default)]
    pub ticker_sentiment: Vec<TickerSentiment>,
}

#[derive(Debug, Deserialize)]
pub struct TickerSentiment {
    pub ticker: String,
    pub ticker_sentiment_score: Option<NumberOrText>,
    pub ticker_sentiment_label: Option<String>,
}

/// Alpha Vantage emits numeric fields as JSON strings in some payloads
/// and as numbers in others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

/// Parse a NewsAPI `everything` payload into articles for one symbol.
/// Items with an unparseable publication timestamp are dropped.
pub fn parse_newsapi(symbol: &str, json: &str) -> Result<Vec<Article>> {
    let response: NewsApiResponse =
        serde_json::from_str(json).context("Failed to parse NewsAPI payload")?;

    let articles = response
        .articles
        .into_iter()
        .filter_map(|item| {
            let Some(published) = parse_published(&item.published_at) else {
                warn!(
                    "dropping NewsAPI article with unparseable timestamp '{}'",
                    item.published_at
                );
                return None;
            };
            Some(Article {
                symbol: symbol.to_string(),
                title: item.title.unwrap_or_default(),
                summary: item.description.unwrap_or_default(),
                source: item.source.name,
                url: item.url,
                published,
                overall_sentiment_score: None,
                overall_sentiment_label: None,
                ticker_sentiment_score: None,
                ticker_sentiment_label: None,
            })
        })
        .collect();
    Ok(articles)
}

/// Parse an Alpha Vantage `NEWS_SENTIMENT` payload into articles for one
/// symbol. The per-ticker sentiment entry matching the symbol, if any,
/// contributes the ticker-level score and label.
pub fn parse_alpha_vantage(symbol: &str, json: &str) -> Result<Vec<Article>> {
    let response: AlphaVantageResponse =
        serde_json::from_str(json).context("Failed to parse Alpha Vantage payload")?;

    let articles = response
        .feed
        .into_iter()
        .filter_map(|item| {
            let Some(published) = parse_published(&item.time_published) else {
                warn!(
                    "dropping Alpha Vantage article with unparseable timestamp '{}'",
                    item.time_published
                );
                return None;
            };
            let ticker = item
                .ticker_sentiment
                .iter()
                .find(|ts| ts.ticker.eq_ignore_ascii_case(symbol));
            Some(Article {
                symbol: symbol.to_string(),
                title: item.title,
                summary: item.summary,
                source: item.source,
                url: item.url,
                published,
                overall_sentiment_score: item
                    .overall_sentiment_score
                    .as_ref()
                    .and_then(NumberOrText::as_f64),
                overall_sentiment_label: item.overall_sentiment_label,
                ticker_sentiment_score: ticker
                    .and_then(|ts| ts.ticker_sentiment_score.as_ref())
                    .and_then(NumberOrText::as_f64),
                ticker_sentiment_label: ticker.and_then(|ts| ts.ticker_sentiment_label.clone()),
            })
        })
        .collect();
    Ok(articles)
}

/// Normalize provider timestamp formats to UTC.
///
/// NewsAPI uses RFC 3339, Alpha Vantage a compact `%Y%m%dT%H%M%S`
/// (no zone, documented as US/Eastern-agnostic UTC), RSS-style feeds
/// RFC 2822.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S") {
        return Some(naive.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}
