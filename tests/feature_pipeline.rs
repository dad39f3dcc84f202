//! End-to-end feature engineering: raw CSV in, enriched CSV out.

use approx::assert_relative_eq;
use quantml::application::features::FeatureEngine;
use quantml::config::FeatureConfig;
use quantml::infrastructure::csv_store;
use std::fs;

const RAW_OHLCV: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-02,10.1,10.6,9.9,10,\"1,200,000\"
2024-01-03,10.0,11.2,10.0,11,\"1,350,000\"
2024-01-04,11.1,11.3,8.8,9,\"2,100,000\"
2024-01-05,9.2,12.4,9.1,12,\"1,800,000\"
2024-01-08,12.0,12.5,11.6,12,\"1,500,000\"
";

#[test]
fn enriches_market_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("NVDA_daily.csv");
    fs::write(&input, RAW_OHLCV).unwrap();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let frame = csv_store::read_frame(&input).unwrap();
    let enriched = engine.enrich_ohlcv(frame);

    // Derived columns appear in dependency order after the raw ones
    let names: Vec<&str> = enriched.column_names().collect();
    assert_eq!(
        names,
        vec![
            "Open",
            "High",
            "Low",
            "Close",
            "Volume",
            "Returns",
            "NormalizedPrice",
            "MA_5",
            "MA_20",
            "MA_50",
            "Volatility",
            "ReturnsOutlierScore",
            "VolatilityOutlierScore",
        ]
    );

    // Thousands separators coerced
    let volume = enriched.numeric("Volume").unwrap();
    assert_eq!(volume[0], 1_200_000.0);

    // Returns: first row backfilled from the second after imputation
    let returns = enriched.numeric("Returns").unwrap();
    assert_relative_eq!(returns[0], 0.1, max_relative = 1e-9);
    assert_relative_eq!(returns[2], -0.18181818, max_relative = 1e-6);
    assert_relative_eq!(returns[3], 1.0 / 3.0, max_relative = 1e-9);
    assert_relative_eq!(returns[4], 0.0, max_relative = 1e-9);

    // NormalizedPrice spans [0, 1] over the observed range
    let normalized = enriched.numeric("NormalizedPrice").unwrap();
    let expected = [1.0 / 3.0, 2.0 / 3.0, 0.0, 1.0, 1.0];
    for (actual, expected) in normalized.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, max_relative = 1e-9);
    }

    // Volatility = High - Low
    let volatility = enriched.numeric("Volatility").unwrap();
    assert_relative_eq!(volatility[0], 0.7, max_relative = 1e-9);
    assert_relative_eq!(volatility[2], 2.5, max_relative = 1e-9);

    // Outlier scores stay inside the unit interval
    for column in ["ReturnsOutlierScore", "VolatilityOutlierScore"] {
        for value in enriched.numeric(column).unwrap() {
            assert!(
                (0.0..=1.0).contains(value),
                "{} value {} out of range",
                column,
                value
            );
        }
    }

    // MA_5 fills on the fifth row; earlier rows were imputed backward
    let ma5 = enriched.numeric("MA_5").unwrap();
    assert_relative_eq!(ma5[4], 10.8, max_relative = 1e-9);
    assert_relative_eq!(ma5[0], 10.8, max_relative = 1e-9);

    // MA_20 and MA_50 never fill on five rows and stay entirely missing
    for column in ["MA_20", "MA_50"] {
        assert!(enriched.numeric(column).unwrap().iter().all(|v| v.is_nan()));
    }

    // Every other column is fully imputed
    for column in &["Open", "High", "Low", "Close", "Volume", "Returns"] {
        assert!(
            enriched
                .numeric(column)
                .unwrap()
                .iter()
                .all(|v| !v.is_nan()),
            "{} still has missing values",
            column
        );
    }

    // Round-trip through the persistence layer
    let output = dir.path().join("NVDA_daily_processed.csv");
    csv_store::write_frame(&output, &enriched).unwrap();
    let written = csv_store::read_frame(&output).unwrap();
    assert_eq!(written.len(), enriched.len());
    assert_eq!(
        written.column_names().collect::<Vec<_>>(),
        enriched.column_names().collect::<Vec<_>>()
    );
}

#[test]
fn enriches_economic_indicators_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("economic_indicators.csv");
    fs::write(
        &input,
        "\
Date,CPI,FedRate
2024-01-01,\"300.5\",5.25
2024-02-01,,5.25
2024-03-01,302.9,5.25
",
    )
    .unwrap();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let frame = csv_store::read_frame(&input).unwrap();
    let enriched = engine.enrich_indicators(frame);

    // Publication gap carried forward
    let cpi = enriched.numeric("CPI").unwrap();
    assert_relative_eq!(cpi[1], 300.5, max_relative = 1e-9);

    // Normalized sibling spans [0, 1]
    let scaled = enriched.numeric("CPI_Normalized").unwrap();
    assert_relative_eq!(scaled[0], 0.0, max_relative = 1e-9);
    assert_relative_eq!(scaled[2], 1.0, max_relative = 1e-9);

    // Constant indicator: no sibling fabricated
    assert!(enriched.column("FedRate_Normalized").is_none());
}

#[test]
fn tolerates_unconvertible_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("BAD_daily.csv");
    fs::write(
        &input,
        "\
Date,Close,Note
2024-01-02,10,flat session
2024-01-03,11,earnings day
",
    )
    .unwrap();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let enriched = engine.enrich_ohlcv(csv_store::read_frame(&input).unwrap());

    // Close still produces features; the free-text column rides along
    assert!(enriched.column("Returns").is_some());
    assert!(!enriched.column("Note").unwrap().is_numeric());
    // No High/Low: volatility features omitted
    assert!(enriched.column("Volatility").is_none());
    assert!(enriched.column("VolatilityOutlierScore").is_none());
}

#[test]
fn empty_table_produces_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("EMPTY_daily.csv");
    fs::write(&input, "Date,Open,High,Low,Close,Volume\n").unwrap();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let enriched = engine.enrich_ohlcv(csv_store::read_frame(&input).unwrap());

    assert!(enriched.is_empty());
    let output = dir.path().join("EMPTY_daily_processed.csv");
    csv_store::write_frame(&output, &enriched).unwrap();
    assert!(output.exists());
}
