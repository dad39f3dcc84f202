//! Local NLP sentiment analysis using VADER.
//!
//! Fallback scorer for providers that ship text without a sentiment
//! score. VADER's general lexicon is tuned for social media and news
//! prose; a financial keyword layer compensates for market jargon it
//! misses ("beats estimates" reads neutral to VADER, not to a trader).

use crate::domain::ports::SentimentScorer;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Market-specific phrases and their sentiment contributions. Multi-word
/// entries are preferred to avoid false substring matches in headlines.
const BULLISH_KEYWORDS: &[(&str, f64)] = &[
    ("beats estimates", 0.4),
    ("beats expectations", 0.4),
    ("record revenue", 0.4),
    ("record profit", 0.4),
    ("raises guidance", 0.5),
    ("raised guidance", 0.5),
    ("upgrade", 0.3),
    ("upgraded", 0.3),
    ("outperform", 0.3),
    ("overweight", 0.2),
    ("all-time high", 0.5),
    ("52-week high", 0.4),
    ("rally", 0.4),
    ("rallies", 0.4),
    ("surge", 0.4),
    ("surges", 0.4),
    ("soar", 0.5),
    ("soars", 0.5),
    ("buyback", 0.3),
    ("dividend increase", 0.3),
    ("strong demand", 0.3),
    ("breakthrough", 0.4),
];

const BEARISH_KEYWORDS: &[(&str, f64)] = &[
    ("misses estimates", -0.4),
    ("misses expectations", -0.4),
    ("cuts guidance", -0.5),
    ("cut guidance", -0.5),
    ("profit warning", -0.5),
    ("downgrade", -0.3),
    ("downgraded", -0.3),
    ("underperform", -0.3),
    ("underweight", -0.2),
    ("52-week low", -0.4),
    ("plunge", -0.5),
    ("plunges", -0.5),
    ("sell-off", -0.4),
    ("selloff", -0.4),
    ("layoffs", -0.4),
    ("lawsuit", -0.4),
    ("investigation", -0.3),
    ("recall", -0.3),
    ("bankruptcy", -0.6),
    ("fraud", -0.5),
    ("default", -0.4),
    ("weak demand", -0.3),
];

/// VADER analyzer with financial keyword boosting.
pub struct VaderSentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderSentimentAnalyzer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    fn keyword_boost(&self, text_lower: &str) -> f64 {
        let mut boost = 0.0;
        for (keyword, weight) in BULLISH_KEYWORDS {
            if text_lower.contains(keyword) {
                boost += weight;
            }
        }
        for (keyword, weight) in BEARISH_KEYWORDS {
            if text_lower.contains(keyword) {
                boost += weight; // weight is already negative
            }
        }
        boost
    }
}

impl Default for VaderSentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderSentimentAnalyzer {
    /// Polarity in [-1.0, 1.0]: VADER compound score plus half the
    /// keyword boost, clamped. Empty text and lexicon misses score 0.0.
    fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        let boost = self.keyword_boost(&text.to_lowercase());

        (compound + boost * 0.5).clamp(-1.0, 1.0)
    }
}
