//! Descriptive statistics.
//!
//! Conventions (pinned so results are reproducible across tools):
//!
//! - Standard deviation uses the n−1 sample formula.
//! - Percentiles use linear interpolation between order statistics
//!   (the rank `h = (n−1)·p` rule, R's type 7 and numpy's default).
//! - Skewness is the adjusted Fisher-Pearson coefficient
//!   `G1 = g1 · √(n(n−1)) / (n−2)` and kurtosis is the adjusted excess
//!   `G2`, matching the sample-corrected values reported by pandas.
//!   `G1` is NaN for n < 3 and `G2` is NaN for n < 4.
//!
//! # References
//!
//! - Joanes, D.N. & Gill, C.A. (1998). Comparing measures of sample
//!   skewness and kurtosis. *The Statistician*, 47(1), 183-189.
//! - Hyndman, R.J. & Fan, Y. (1996). Sample quantiles in statistical
//!   packages. *The American Statistician*, 50(4), 361-365.

use crate::core::StatisticalError;
use serde::Serialize;

/// Immutable snapshot of the distribution of one numeric sequence.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// 50th percentile.
    pub median: f64,
    /// Sample standard deviation (n−1). Zero for a single observation.
    pub std: f64,
    /// Smallest observation.
    pub min: f64,
    /// Largest observation.
    pub max: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile (Q1).
    pub p25: f64,
    /// 75th percentile (Q3).
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
    /// Interquartile range, Q3 − Q1.
    pub iqr: f64,
    /// Adjusted Fisher-Pearson skewness G1 (NaN for n < 3).
    pub skewness: f64,
    /// Adjusted excess kurtosis G2 (NaN for n < 4).
    pub kurtosis: f64,
}

/// Compute a full descriptive summary of `data`.
///
/// Fails with [`StatisticalError::EmptyData`] on an empty input.
pub fn describe(data: &[f64]) -> Result<DescriptiveStats, StatisticalError> {
    if data.is_empty() {
        return Err(StatisticalError::EmptyData);
    }

    let n = data.len();
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = mean(data);
    let std = sample_std(data, mean);
    let p25 = percentile_sorted(&sorted, 25.0);
    let p75 = percentile_sorted(&sorted, 75.0);

    Ok(DescriptiveStats {
        count: n,
        mean,
        median: percentile_sorted(&sorted, 50.0),
        std,
        min: sorted[0],
        max: sorted[n - 1],
        p5: percentile_sorted(&sorted, 5.0),
        p25,
        p75,
        p95: percentile_sorted(&sorted, 95.0),
        iqr: p75 - p25,
        skewness: adjusted_skewness(data, mean),
        kurtosis: adjusted_kurtosis(data, mean),
    })
}

/// The p-th percentile (0-100) by linear interpolation.
///
/// Fails with [`StatisticalError::EmptyData`] on an empty input.
pub fn percentile(data: &[f64], p: f64) -> Result<f64, StatisticalError> {
    if data.is_empty() {
        return Err(StatisticalError::EmptyData);
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(percentile_sorted(&sorted, p))
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n−1); zero when n < 2.
pub(crate) fn sample_std(data: &[f64], mean: f64) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let ss: f64 = data.iter().map(|&x| (x - mean).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

pub(crate) fn sample_variance(data: &[f64], mean: f64) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Percentile on pre-sorted data; `p` is clamped to [0, 100].
pub(crate) fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let p = p.clamp(0.0, 100.0);
    let h = (n - 1) as f64 * p / 100.0;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

fn adjusted_skewness(data: &[f64], mean: f64) -> f64 {
    let n = data.len();
    if n < 3 {
        return f64::NAN;
    }
    let nf = n as f64;
    let m2: f64 = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / nf;
    let m3: f64 = data.iter().map(|&x| (x - mean).powi(3)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return f64::NAN;
    }
    let g1 = m3 / m2.powf(1.5);
    (nf * (nf - 1.0)).sqrt() / (nf - 2.0) * g1
}

fn adjusted_kurtosis(data: &[f64], mean: f64) -> f64 {
    let n = data.len();
    if n < 4 {
        return f64::NAN;
    }
    let nf = n as f64;
    let s2 = sample_variance(data, mean);
    if s2 <= 0.0 {
        return f64::NAN;
    }
    let m4: f64 = data.iter().map(|&x| (x - mean).powi(4)).sum();
    nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0)) * m4 / (s2 * s2)
        - 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0))
}
