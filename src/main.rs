use anyhow::{Context, Result};
use clap::Parser;
use quantml::application::features::FeatureEngine;
use quantml::application::sentiment::SentimentAggregator;
use quantml::config::Config;
use quantml::domain::article::{Article, SymbolKeywords};
use quantml::infrastructure::csv_store;
use quantml::infrastructure::news::adapter;
use quantml::infrastructure::news::sentiment_analyzer::VaderSentimentAnalyzer;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Feature-engineering pipeline: raw tables in, ML-ready tables out.
///
/// Market files are expected as `<SYMBOL>_<timeframe>.csv`, economic
/// indicators as `economic_indicators.csv`, news payloads as
/// `news_newsapi_<SYMBOL>.json` / `news_alphavantage_<SYMBOL>.json`.
#[derive(Parser, Debug)]
#[command(name = "quantml", version, about = "ML-ready feature engineering pipeline")]
struct Args {
    /// Directory containing raw input tables
    #[arg(long, default_value = "data/raw")]
    input_dir: PathBuf,

    /// Directory processed tables are written to
    #[arg(long, default_value = "data/processed")]
    output_dir: PathBuf,

    /// Symbols to aggregate news for (overrides SYMBOLS)
    #[arg(long, value_delimiter = ',')]
    symbols: Vec<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if !args.symbols.is_empty() {
        config.symbols = args.symbols.iter().map(|s| s.to_uppercase()).collect();
    }

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    info!("Starting feature engineering pipeline");
    process_market_files(&args, &config);
    process_economic_indicators(&args, &config)?;
    process_news(&args, &config)?;
    info!("Pipeline completed; output in {}", args.output_dir.display());
    Ok(())
}

/// Enrich every `<SYMBOL>_<timeframe>.csv` in the input directory.
/// Symbols and timeframes are independent, so files fan out in parallel;
/// a failing file is logged and skipped, never fatal for the rest.
fn process_market_files(args: &Args, config: &Config) {
    let files = match market_files(&args.input_dir) {
        Ok(files) => files,
        Err(e) => {
            error!("Failed to scan {}: {}", args.input_dir.display(), e);
            return;
        }
    };
    if files.is_empty() {
        warn!("No market data files found in {}", args.input_dir.display());
        return;
    }

    let engine = FeatureEngine::new(config.feature.clone());
    files.par_iter().for_each(|path| {
        if let Err(e) = process_market_file(&engine, path, &args.output_dir) {
            error!("Failed to process {}: {}", path.display(), e);
        }
    });
}

fn process_market_file(engine: &FeatureEngine, path: &Path, output_dir: &Path) -> Result<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .context("Non-UTF8 file name")?;
    info!("Processing market data: {}", stem);

    let frame = csv_store::read_frame(path)?;
    let enriched = engine.enrich_ohlcv(frame);

    let output = output_dir.join(format!("{}_processed.csv", stem));
    csv_store::write_frame(&output, &enriched)?;
    info!("Wrote {} ({} rows)", output.display(), enriched.len());
    Ok(())
}

fn process_economic_indicators(args: &Args, config: &Config) -> Result<()> {
    let input = args.input_dir.join("economic_indicators.csv");
    if !input.exists() {
        warn!("Economic indicators file not found; skipping");
        return Ok(());
    }

    info!("Processing economic indicators");
    let engine = FeatureEngine::new(config.feature.clone());
    let frame = csv_store::read_frame(&input)?;
    let enriched = engine.enrich_indicators(frame);

    let output = args.output_dir.join("economic_indicators_processed.csv");
    csv_store::write_frame(&output, &enriched)?;
    info!("Wrote {} ({} rows)", output.display(), enriched.len());
    Ok(())
}

/// Load provider payloads per symbol, filter for relevance, aggregate all
/// surviving articles into one daily sentiment table.
fn process_news(args: &Args, config: &Config) -> Result<()> {
    let aggregator = SentimentAggregator::new(
        config.sentiment.clone(),
        Arc::new(VaderSentimentAnalyzer::new()),
    );

    let mut relevant: Vec<Article> = Vec::new();
    for symbol in &config.symbols {
        let keywords = SymbolKeywords::new(symbol, &[]);
        for (suffix, parse) in [
            ("newsapi", adapter::parse_newsapi as fn(&str, &str) -> Result<Vec<Article>>),
            ("alphavantage", adapter::parse_alpha_vantage),
        ] {
            let path = args
                .input_dir
                .join(format!("news_{}_{}.json", suffix, symbol));
            if !path.exists() {
                continue;
            }
            let payload = match fs::read_to_string(&path) {
                Ok(payload) => payload,
                Err(e) => {
                    error!("Failed to read {}: {}", path.display(), e);
                    continue;
                }
            };
            match parse(symbol, &payload) {
                Ok(articles) => {
                    info!("Loaded {} articles for {} from {}", articles.len(), symbol, suffix);
                    relevant.extend(aggregator.filter_relevant(articles, &keywords));
                }
                Err(e) => error!("Failed to parse {}: {}", path.display(), e),
            }
        }
    }

    if relevant.is_empty() {
        warn!("No relevant news articles collected; skipping sentiment summary");
        return Ok(());
    }

    let summary = aggregator.aggregate_daily(&relevant);
    let output = args.output_dir.join("news_daily_sentiment.csv");
    csv_store::write_daily_sentiment(&output, &summary)?;
    info!("Wrote {} ({} rows)", output.display(), summary.len());
    Ok(())
}

/// Market data files: `<SYMBOL>_<timeframe>.csv`, excluding the economic
/// indicators table and any already-processed output.
fn market_files(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read {}", input_dir.display()))?
    {
        let path = entry?.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        if is_csv
            && stem.contains('_')
            && stem != "economic_indicators"
            && !stem.starts_with("news_")
            && !stem.ends_with("_processed")
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
