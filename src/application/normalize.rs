//! Min-max normalization shared by the feature engine and outlier scoring.

/// Observed minimum and maximum over the non-missing values of a series.
///
/// Returns `None` when no finite value is present.
pub fn observed_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for &value in values {
        if value.is_nan() {
            continue;
        }
        range = Some(match range {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }
    range
}

/// Rescale the series linearly into [0, 1] over its observed range.
///
/// Missing values stay missing. Returns `None` when the range is zero or
/// the series holds no observation, so callers omit the derived column
/// instead of fabricating a constant feature.
pub fn min_max_normalize(values: &[f64]) -> Option<Vec<f64>> {
    let (min, max) = observed_range(values)?;
    if max <= min {
        return None;
    }
    Some(values.iter().map(|&v| (v - min) / (max - min)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_spans_unit_interval() {
        let scaled = min_max_normalize(&[9.0, 10.5, 12.0]).unwrap();
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_ignores_missing_values() {
        let scaled = min_max_normalize(&[f64::NAN, 0.0, 10.0]).unwrap();
        assert!(scaled[0].is_nan());
        assert_eq!(scaled[1], 0.0);
        assert_eq!(scaled[2], 1.0);
    }

    #[test]
    fn test_constant_series_is_rejected() {
        assert!(min_max_normalize(&[5.0, 5.0, 5.0]).is_none());
    }

    #[test]
    fn test_empty_and_all_missing() {
        assert!(min_max_normalize(&[]).is_none());
        assert!(min_max_normalize(&[f64::NAN, f64::NAN]).is_none());
        assert!(observed_range(&[f64::NAN]).is_none());
    }
}
