//! Outlier detection by IQR fences or z-scores.

use crate::core::StatisticalError;
use crate::stats::descriptive::{mean, percentile_sorted, sample_std};
use serde::Serialize;

/// Flagging rule to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutlierMethod {
    /// Flag values outside [Q1 − t·IQR, Q3 + t·IQR]. The conventional
    /// threshold is 1.5.
    #[default]
    Iqr,
    /// Flag values with |z| > t against the sample mean and standard
    /// deviation. The conventional threshold is 3.0.
    ZScore,
}

/// Indices and values of flagged observations, as parallel sequences in
/// input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutlierResult {
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
}

impl OutlierResult {
    /// Whether nothing was flagged.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of flagged observations.
    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// Detect outliers in `data`.
///
/// An empty input yields an empty result rather than an error. A constant
/// input never flags anything under either method.
pub fn detect_outliers(
    data: &[f64],
    method: OutlierMethod,
    threshold: f64,
) -> Result<OutlierResult, StatisticalError> {
    if data.is_empty() {
        return Ok(OutlierResult::default());
    }

    let flagged: Box<dyn Fn(f64) -> bool> = match method {
        OutlierMethod::Iqr => {
            let mut sorted = data.to_vec();
            sorted.sort_by(f64::total_cmp);
            let q1 = percentile_sorted(&sorted, 25.0);
            let q3 = percentile_sorted(&sorted, 75.0);
            let iqr = q3 - q1;
            let lower = q1 - threshold * iqr;
            let upper = q3 + threshold * iqr;
            Box::new(move |v| v < lower || v > upper)
        }
        OutlierMethod::ZScore => {
            let m = mean(data);
            let sd = sample_std(data, m);
            if sd <= 0.0 {
                // No spread, no outliers.
                return Ok(OutlierResult::default());
            }
            Box::new(move |v| ((v - m) / sd).abs() > threshold)
        }
    };

    let mut result = OutlierResult::default();
    for (i, &v) in data.iter().enumerate() {
        if flagged(v) {
            result.indices.push(i);
            result.values.push(v);
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_empty_result() {
        let result = detect_outliers(&[], OutlierMethod::Iqr, 1.5).expect("should run");
        assert!(result.is_empty());
    }

    #[test]
    fn test_iqr_flags_single_spike() {
        let data = [10.0, 12.0, 11.0, 13.0, 12.0, 100.0, 14.0, 15.0, 13.0, 12.0];
        let result = detect_outliers(&data, OutlierMethod::Iqr, 1.5).expect("should run");
        assert_eq!(result.indices, vec![5]);
        assert_eq!(result.values, vec![100.0]);
    }

    #[test]
    fn test_no_outliers_in_tight_data() {
        let data = [10.0, 11.0, 12.0, 11.0, 10.0, 12.0, 11.0];
        let result = detect_outliers(&data, OutlierMethod::Iqr, 1.5).expect("should run");
        assert!(result.is_empty());
        let result = detect_outliers(&data, OutlierMethod::ZScore, 3.0).expect("should run");
        assert!(result.is_empty());
    }

    #[test]
    fn test_zscore_flags_extremes() {
        let mut data = vec![0.0; 20];
        for (i, v) in data.iter_mut().enumerate() {
            *v = (i % 5) as f64;
        }
        data.push(1000.0);
        let result = detect_outliers(&data, OutlierMethod::ZScore, 3.0).expect("should run");
        assert_eq!(result.indices, vec![20]);
    }

    #[test]
    fn test_constant_data_has_no_outliers() {
        let data = [7.0; 10];
        let result = detect_outliers(&data, OutlierMethod::ZScore, 3.0).expect("should run");
        assert!(result.is_empty());
    }
}
