//! Daily sentiment aggregation over collected news articles.
//!
//! Articles arrive already normalized by the provider adapters; this
//! module filters them for relevance, resolves one sentiment score per
//! article and folds the scores into per-(symbol, day) summaries with a
//! confidence weight.

use crate::config::SentimentConfig;
use crate::domain::article::{Article, DailySentiment, SymbolKeywords};
use crate::domain::ports::SentimentScorer;
use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub struct SentimentAggregator {
    config: SentimentConfig,
    scorer: Arc<dyn SentimentScorer>,
}

#[derive(Default)]
struct DayGroup {
    scores: Vec<f64>,
    articles: usize,
}

impl SentimentAggregator {
    pub fn new(config: SentimentConfig, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { config, scorer }
    }

    /// An article is relevant to a symbol iff its title+summary text
    /// mentions one of the symbol's keyword variants and none of the
    /// disqualifying keywords. Both checks run on the same lower-cased
    /// concatenation.
    pub fn is_relevant(&self, article: &Article, keywords: &SymbolKeywords) -> bool {
        let text = article.text().to_lowercase();
        if !keywords.matches(&text) {
            return false;
        }
        !self
            .config
            .disqualifying_keywords
            .iter()
            .any(|kw| text.contains(kw.as_str()))
    }

    /// Keep only the articles relevant to the symbol. Applied per source,
    /// before aggregation.
    pub fn filter_relevant(
        &self,
        articles: Vec<Article>,
        keywords: &SymbolKeywords,
    ) -> Vec<Article> {
        let total = articles.len();
        let relevant: Vec<Article> = articles
            .into_iter()
            .filter(|a| self.is_relevant(a, keywords))
            .collect();
        debug!(
            "relevance filter for {}: kept {}/{} articles",
            keywords.symbol,
            relevant.len(),
            total
        );
        relevant
    }

    /// Provider-supplied sentiment is used as-is; text-only articles fall
    /// back to lexical analysis of the concatenated title and summary.
    pub fn resolve_score(&self, article: &Article) -> f64 {
        match article.overall_sentiment_score {
            Some(score) => score,
            None => self.scorer.score(&article.text()),
        }
    }

    /// Fold articles into one summary row per (symbol, calendar date).
    ///
    /// Fully regenerated on every run; an empty input produces an empty
    /// table. Confidence rewards corroboration (article volume) and
    /// agreement (low score dispersion):
    /// `min(article_count / normalizer, 1) * (1 - std)`, where an
    /// undefined dispersion (single-article group) is substituted by the
    /// configured neutral penalty before the product, and the result is
    /// kept in [0, 1].
    pub fn aggregate_daily(&self, articles: &[Article]) -> Vec<DailySentiment> {
        let mut groups: BTreeMap<(String, NaiveDate), DayGroup> = BTreeMap::new();

        for article in articles {
            let score = self.resolve_score(article);
            let group = groups
                .entry((article.symbol.clone(), article.published_date()))
                .or_default();
            group.articles += 1;
            if score.is_finite() {
                group.scores.push(score);
            }
        }

        groups
            .into_iter()
            .map(|((symbol, date), group)| self.summarize(symbol, date, group))
            .collect()
    }

    fn summarize(&self, symbol: String, date: NaiveDate, group: DayGroup) -> DailySentiment {
        let count = group.scores.len();
        let mean = if count > 0 {
            group.scores.iter().mean()
        } else {
            0.0
        };
        let std = if count > 1 {
            Some(group.scores.iter().population_std_dev())
        } else {
            None
        };

        let volume = (group.articles as f64 / self.config.article_normalizer).min(1.0);
        let consistency = 1.0 - std.unwrap_or(self.config.std_penalty);
        let confidence = (volume * consistency).clamp(0.0, 1.0);

        DailySentiment {
            symbol,
            date,
            sentiment_mean: mean,
            sentiment_std: std.unwrap_or(0.0),
            sentiment_count: count,
            article_count: group.articles,
            sentiment_confidence: confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    struct NeutralScorer;

    impl SentimentScorer for NeutralScorer {
        fn score(&self, _text: &str) -> f64 {
            0.0
        }
    }

    struct FixedScorer(f64);

    impl SentimentScorer for FixedScorer {
        fn score(&self, text: &str) -> f64 {
            if text.trim().is_empty() { 0.0 } else { self.0 }
        }
    }

    fn aggregator() -> SentimentAggregator {
        SentimentAggregator::new(SentimentConfig::default(), Arc::new(NeutralScorer))
    }

    fn article(symbol: &str, day: u32, title: &str, score: Option<f64>) -> Article {
        Article {
            symbol: symbol.to_string(),
            title: title.to_string(),
            summary: String::new(),
            source: "test".to_string(),
            url: None,
            published: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            overall_sentiment_score: score,
            overall_sentiment_label: None,
            ticker_sentiment_score: None,
            ticker_sentiment_label: None,
        }
    }

    #[test]
    fn test_three_article_group_confidence() {
        let articles = vec![
            article("NVDA", 5, "a", Some(0.2)),
            article("NVDA", 5, "b", Some(0.4)),
            article("NVDA", 5, "c", Some(0.6)),
        ];

        let summary = aggregator().aggregate_daily(&articles);
        assert_eq!(summary.len(), 1);

        let row = &summary[0];
        assert_eq!(row.symbol, "NVDA");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_relative_eq!(row.sentiment_mean, 0.4, max_relative = 1e-9);
        assert_relative_eq!(row.sentiment_std, 0.16329932, max_relative = 1e-6);
        assert_eq!(row.sentiment_count, 3);
        assert_eq!(row.article_count, 3);
        assert_relative_eq!(row.sentiment_confidence, 0.2510102, max_relative = 1e-5);
    }

    #[test]
    fn test_single_article_group_gets_neutral_penalty() {
        let summary = aggregator().aggregate_daily(&[article("NVDA", 5, "a", Some(0.9))]);

        let row = &summary[0];
        assert_eq!(row.article_count, 1);
        assert_eq!(row.sentiment_std, 0.0);
        // min(1/10, 1) * (1 - 0.5)
        assert_relative_eq!(row.sentiment_confidence, 0.05, max_relative = 1e-9);
    }

    #[test]
    fn test_full_agreement_maximizes_confidence() {
        let articles: Vec<Article> = (0..20)
            .map(|i| {
                let mut a = article("NVDA", 5, "a", Some(0.3));
                a.url = Some(format!("https://example.com/{}", i));
                a
            })
            .collect();

        let summary = aggregator().aggregate_daily(&articles);
        let row = &summary[0];
        assert_eq!(row.sentiment_std, 0.0);
        assert_relative_eq!(row.sentiment_confidence, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_confidence_stays_in_unit_interval() {
        // Extreme disagreement: std > 1 would push (1 - std) negative
        let articles = vec![
            article("NVDA", 5, "a", Some(-1.0)),
            article("NVDA", 5, "b", Some(1.0)),
            article("NVDA", 5, "c", Some(-1.0)),
            article("NVDA", 5, "d", Some(1.0)),
        ];

        let summary = aggregator().aggregate_daily(&articles);
        let confidence = summary[0].sentiment_confidence;
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_groups_partition_by_symbol_and_date() {
        let articles = vec![
            article("NVDA", 5, "a", Some(0.1)),
            article("NVDA", 6, "b", Some(0.2)),
            article("XOM", 5, "c", Some(0.3)),
        ];

        let summary = aggregator().aggregate_daily(&articles);
        assert_eq!(summary.len(), 3);
        // BTreeMap ordering: symbol first, then date
        assert_eq!(summary[0].symbol, "NVDA");
        assert_eq!(summary[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(summary[1].date, NaiveDate::from_ymd_opt(2024, 1, 6).unwrap());
        assert_eq!(summary[2].symbol, "XOM");
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        assert!(aggregator().aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_lexical_fallback_used_without_provider_score() {
        let aggregator =
            SentimentAggregator::new(SentimentConfig::default(), Arc::new(FixedScorer(0.7)));

        let with_provider = article("NVDA", 5, "a", Some(-0.2));
        let text_only = article("NVDA", 5, "b", None);

        assert_relative_eq!(aggregator.resolve_score(&with_provider), -0.2);
        assert_relative_eq!(aggregator.resolve_score(&text_only), 0.7);
    }

    #[test]
    fn test_relevance_filter() {
        let aggregator = aggregator();
        let keywords = SymbolKeywords::new("NVDA", &["NVIDIA Corporation"]);

        let relevant = article("NVDA", 5, "NVIDIA beats datacenter estimates", None);
        let off_topic = article("NVDA", 5, "Semiconductor sector roundup", None);
        let disqualified = article("NVDA", 5, "NVIDIA CEO spotted at sports event", None);

        assert!(aggregator.is_relevant(&relevant, &keywords));
        assert!(!aggregator.is_relevant(&off_topic, &keywords));
        assert!(!aggregator.is_relevant(&disqualified, &keywords));

        let kept = aggregator.filter_relevant(vec![relevant, off_topic, disqualified], &keywords);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_no_relevant_articles_no_rows() {
        let aggregator = aggregator();
        let keywords = SymbolKeywords::new("NVDA", &[]);

        let kept = aggregator.filter_relevant(
            vec![article("NVDA", 5, "Weather forecast for Ohio", None)],
            &keywords,
        );
        let summary = aggregator.aggregate_daily(&kept);
        assert!(summary.is_empty());
    }
}
