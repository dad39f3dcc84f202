//! News article records and daily sentiment summaries.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single collected news item, normalized across providers.
///
/// Created once by an adapter at the collection boundary and never
/// mutated; aggregation only reads these records. Providers that ship
/// pre-computed sentiment populate the optional score/label fields,
/// text-only providers leave them empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub symbol: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: Option<String>,
    pub published: DateTime<Utc>,
    pub overall_sentiment_score: Option<f64>,
    pub overall_sentiment_label: Option<String>,
    pub ticker_sentiment_score: Option<f64>,
    pub ticker_sentiment_label: Option<String>,
}

impl Article {
    /// Title and summary joined, the text relevance and sentiment operate on.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }

    /// UTC calendar date used as the aggregation key.
    pub fn published_date(&self) -> NaiveDate {
        self.published.date_naive()
    }
}

/// One aggregated row per (symbol, calendar date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySentiment {
    pub symbol: String,
    pub date: NaiveDate,
    pub sentiment_mean: f64,
    pub sentiment_std: f64,
    pub sentiment_count: usize,
    pub article_count: usize,
    pub sentiment_confidence: f64,
}

/// Corporate suffixes stripped from company names before keyword matching.
const CORPORATE_SUFFIXES: &[&str] = &[" Inc.", " Inc", " Corp.", " Corp", " Corporation", " Ltd."];

/// Keyword variants that identify a symbol in article text.
///
/// Built from the ticker plus any known company long/short names with
/// corporate suffixes stripped. Matching is case-insensitive; keywords
/// are stored lower-cased.
#[derive(Debug, Clone)]
pub struct SymbolKeywords {
    pub symbol: String,
    pub keywords: Vec<String>,
}

impl SymbolKeywords {
    pub fn new(symbol: &str, company_names: &[&str]) -> Self {
        let mut keywords = vec![symbol.to_lowercase()];
        for name in company_names {
            let mut stripped = name.to_string();
            for suffix in CORPORATE_SUFFIXES {
                if let Some(base) = stripped.strip_suffix(suffix) {
                    stripped = base.trim_end_matches(',').to_string();
                }
            }
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                let lowered = stripped.to_lowercase();
                if !keywords.contains(&lowered) {
                    keywords.push(lowered);
                }
            }
        }
        Self {
            symbol: symbol.to_string(),
            keywords,
        }
    }

    /// True if the (already lower-cased) text mentions any keyword variant.
    pub fn matches(&self, text_lower: &str) -> bool {
        self.keywords.iter().any(|kw| text_lower.contains(kw.as_str()))
    }
}
