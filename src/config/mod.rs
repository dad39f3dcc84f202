//! Configuration module for quantml.
//!
//! Structured configuration loading from environment variables, organized
//! by domain: feature engineering and sentiment aggregation. The binary
//! loads a `.env` file via `dotenvy` before calling [`Config::from_env`];
//! the core engines only ever see the composed structs.

mod feature_config;
mod sentiment_config;

pub use feature_config::FeatureConfig;
pub use sentiment_config::SentimentConfig;

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Symbols the pipeline collects and aggregates news for.
    pub symbols: Vec<String>,
    pub feature: FeatureConfig,
    pub sentiment: SentimentConfig,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// everything so a bare environment is always valid.
    pub fn from_env() -> Result<Self> {
        let symbols = env::var("SYMBOLS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_symbols());

        Ok(Self {
            symbols,
            feature: FeatureConfig::from_env().context("Failed to load feature config")?,
            sentiment: SentimentConfig::from_env().context("Failed to load sentiment config")?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            feature: FeatureConfig::default(),
            sentiment: SentimentConfig::default(),
        }
    }
}

fn default_symbols() -> Vec<String> {
    vec!["SOXL".to_string(), "NVDA".to_string(), "XOM".to_string()]
}

/// Parse an env var, falling back to a default when unset and failing
/// loudly when set to garbage.
pub(crate) fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: '{}' ({})", key, raw, e)),
        Err(_) => Ok(default),
    }
}
