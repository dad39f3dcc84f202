use super::parse_env;
use anyhow::Result;
use std::env;

/// Tunables of the market/economic feature engine.
#[derive(Debug, Clone)]
pub struct FeatureConfig {
    /// Z-score threshold for the boolean outlier mask.
    pub outlier_threshold: f64,
    /// Trailing moving-average windows, in periods.
    pub ma_windows: Vec<usize>,
}

impl FeatureConfig {
    pub fn from_env() -> Result<Self> {
        let outlier_threshold = parse_env("OUTLIER_THRESHOLD", 3.0)?;

        let ma_windows = match env::var("MA_WINDOWS") {
            Ok(raw) => {
                let mut windows = Vec::new();
                for part in raw.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    let window: usize = part
                        .parse()
                        .map_err(|e| anyhow::anyhow!("Invalid MA_WINDOWS entry '{}': {}", part, e))?;
                    if window == 0 {
                        anyhow::bail!("Invalid MA_WINDOWS entry '0': window must be positive");
                    }
                    windows.push(window);
                }
                windows
            }
            Err(_) => default_windows(),
        };

        Ok(Self {
            outlier_threshold,
            ma_windows,
        })
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            outlier_threshold: 3.0,
            ma_windows: default_windows(),
        }
    }
}

fn default_windows() -> Vec<usize> {
    vec![5, 20, 50]
}
