//! Z-score outlier detection and scoring.
//!
//! Both the market feature engine and the economic path feed their
//! derived series through these primitives. Extreme values are scored,
//! never removed: the downstream models consume outlier intensity as a
//! feature in its own right.

use statrs::statistics::Statistics;

/// Default Z-score threshold for the boolean mask.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

/// Flag outliers as |x - mean| / std > threshold over the non-missing values.
///
/// The result is aligned to the positions that held a value; a constant
/// series (zero standard deviation) flags nothing.
pub fn outlier_mask(values: &[f64], threshold: f64) -> Vec<(usize, bool)> {
    let observed = observed(values);
    if observed.is_empty() {
        return Vec::new();
    }
    let (mean, std) = moments(&observed);
    observed
        .iter()
        .map(|&(row, value)| {
            let z = zscore(value, mean, std);
            (row, z > threshold)
        })
        .collect()
}

/// Continuous [0, 1] outlier scores over the non-missing values.
///
/// Absolute z-scores are rescaled over their observed span; a degenerate
/// span (single observation, or all z-scores equal) returns the raw
/// z-scores unscaled, and a zero-variance series scores 0 everywhere.
/// Empty input (after missing-value removal) yields an empty result, not
/// an error.
pub fn outlier_scores(values: &[f64]) -> Vec<(usize, f64)> {
    let observed = observed(values);
    if observed.is_empty() {
        return Vec::new();
    }
    let (mean, std) = moments(&observed);
    if std <= 0.0 {
        return observed.iter().map(|&(row, _)| (row, 0.0)).collect();
    }

    let z_scores: Vec<f64> = observed
        .iter()
        .map(|&(_, value)| zscore(value, mean, std))
        .collect();
    let min_z = z_scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max_z = z_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    observed
        .iter()
        .zip(&z_scores)
        .map(|(&(row, _), &z)| {
            let score = if max_z > min_z {
                (z - min_z) / (max_z - min_z)
            } else {
                z
            };
            (row, score)
        })
        .collect()
}

fn observed(values: &[f64]) -> Vec<(usize, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(row, &v)| (row, v))
        .collect()
}

// Population moments: the scored series is the whole observation set,
// not a sample drawn from it.
fn moments(observed: &[(usize, f64)]) -> (f64, f64) {
    let values: Vec<f64> = observed.iter().map(|&(_, v)| v).collect();
    let mean = values.iter().mean();
    let std = values.iter().population_std_dev();
    (mean, std)
}

fn zscore(value: f64, mean: f64, std: f64) -> f64 {
    if std > 0.0 { (value - mean).abs() / std } else { 0.0 }
}
