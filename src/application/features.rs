//! Market and economic feature engineering.
//!
//! Turns one raw OHLCV frame (or one economic-indicator frame) into the
//! enriched table the ML layer trains on. The engine is pure: it consumes
//! a frame, derives columns in dependency order and returns a new table
//! with the same row index. Fetching and persistence live elsewhere.

use crate::application::{normalize, outliers};
use crate::config::FeatureConfig;
use crate::domain::frame::Frame;
use tracing::{debug, warn};

/// Known numeric columns of a raw market frame, in provider spelling.
pub const OHLCV_COLUMNS: &[&str] = &["Open", "High", "Low", "Close", "Volume", "Adj Close"];

pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Enrich one symbol's OHLCV frame with returns, normalized price,
    /// moving averages, volatility and outlier scores.
    ///
    /// Derivation order matters: later features consume earlier derived
    /// columns. A column that cannot be coerced to numeric is left
    /// untouched and the features depending on it are skipped, never
    /// fatal. The returned frame ends with a forward-fill then
    /// backward-fill pass so only genuinely all-missing columns keep
    /// missing values.
    pub fn enrich_ohlcv(&self, mut frame: Frame) -> Frame {
        for column in OHLCV_COLUMNS {
            if frame.column(column).is_some() {
                if let Err(e) = frame.coerce_numeric(column) {
                    warn!("cannot convert {} column to numeric: {}", column, e);
                }
            }
        }

        match frame.numeric("Close").map(<[f64]>::to_vec) {
            Some(close) => {
                insert(&mut frame, "Returns", pct_change(&close));

                if let Some(scaled) = normalize::min_max_normalize(&close) {
                    insert(&mut frame, "NormalizedPrice", scaled);
                } else {
                    debug!("Close range is zero; NormalizedPrice omitted");
                }

                for &window in &self.config.ma_windows {
                    insert(&mut frame, format!("MA_{}", window), rolling_mean(&close, window));
                }
            }
            None => {
                warn!("Close column missing or non-numeric; price features skipped");
            }
        }

        if let (Some(high), Some(low)) = (frame.numeric("High"), frame.numeric("Low")) {
            let volatility: Vec<f64> = high.iter().zip(low).map(|(h, l)| h - l).collect();
            insert(&mut frame, "Volatility", volatility);
        }

        if let Some(returns) = frame.numeric("Returns").map(<[f64]>::to_vec) {
            let scores = outliers::outlier_scores(&returns);
            let len = frame.len();
            insert(
                &mut frame,
                "ReturnsOutlierScore",
                aligned_scores(len, &scores),
            );
        }

        if let Some(volatility) = frame.numeric("Volatility").map(<[f64]>::to_vec) {
            let scores = outliers::outlier_scores(&volatility);
            let len = frame.len();
            insert(
                &mut frame,
                "VolatilityOutlierScore",
                aligned_scores(len, &scores),
            );
        }

        frame.forward_fill();
        frame.backward_fill();
        frame
    }

    /// Boolean outlier mask over an arbitrary series, at the configured
    /// Z-score threshold. Exposed for callers that want to flag rather
    /// than score (the enrichment paths consume scores).
    pub fn outlier_mask(&self, values: &[f64]) -> Vec<(usize, bool)> {
        outliers::outlier_mask(values, self.config.outlier_threshold)
    }

    /// Enrich an economic-indicator frame: coerce each column, carry
    /// observations forward across publication gaps, then append a
    /// `<name>_Normalized` sibling for every numeric column with a
    /// non-zero range.
    pub fn enrich_indicators(&self, mut frame: Frame) -> Frame {
        let names: Vec<String> = frame.column_names().map(String::from).collect();

        for name in &names {
            if let Err(e) = frame.coerce_numeric(name) {
                warn!("cannot convert {} column to numeric: {}", name, e);
            }
        }

        frame.forward_fill();

        for name in &names {
            let Some(values) = frame.numeric(name).map(<[f64]>::to_vec) else {
                continue;
            };
            match normalize::min_max_normalize(&values) {
                Some(scaled) => insert(&mut frame, format!("{}_Normalized", name), scaled),
                None => debug!("indicator {} has zero range; normalization skipped", name),
            }
        }

        frame
    }
}

/// Period-over-period fractional change. The first period is undefined;
/// a missing operand leaves the change undefined for that period.
fn pct_change(values: &[f64]) -> Vec<f64> {
    let mut changes = Vec::with_capacity(values.len());
    for (i, &current) in values.iter().enumerate() {
        if i == 0 {
            changes.push(f64::NAN);
            continue;
        }
        let previous = values[i - 1];
        if previous.is_nan() || current.is_nan() {
            changes.push(f64::NAN);
        } else {
            changes.push((current - previous) / previous);
        }
    }
    changes
}

/// Trailing simple moving average: undefined until the window is full,
/// and undefined whenever the window contains a missing value.
fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let mut means = Vec::with_capacity(values.len());
    for i in 0..values.len() {
        if window == 0 || i + 1 < window {
            means.push(f64::NAN);
            continue;
        }
        let slice = &values[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            means.push(f64::NAN);
        } else {
            means.push(slice.iter().sum::<f64>() / window as f64);
        }
    }
    means
}

/// Expand sparse (row, score) pairs back into a full-length column;
/// unscored rows stay missing until the terminal fill pass.
fn aligned_scores(len: usize, scores: &[(usize, f64)]) -> Vec<f64> {
    let mut column = vec![f64::NAN; len];
    for &(row, score) in scores {
        if row < len {
            column[row] = score;
        }
    }
    column
}

fn insert(frame: &mut Frame, name: impl Into<String>, values: Vec<f64>) {
    let name = name.into();
    if let Err(e) = frame.insert_numeric(name.clone(), values) {
        warn!("skipping derived column {}: {}", name, e);
    }
}
