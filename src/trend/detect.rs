//! Trend detection via ordinary least squares.
//!
//! A straight line is fitted to value against observation index (or day
//! offsets when dates are supplied). The direction is "up" or "down" only
//! when the slope is statistically distinguishable from zero at the
//! configured significance level; otherwise the series is "stable".
//!
//! Changepoints are located by recursive binary segmentation: the split
//! minimizing the combined sum of squared errors of the two segments is
//! accepted when it removes at least `min_gain` of the segment's SSE, then
//! both halves are searched recursively. Each reported index is the first
//! observation of the new regime.
//!
//! # References
//!
//! - Scott, A.J. & Knott, M. (1974). A cluster analysis method for grouping
//!   means in the analysis of variance. *Biometrics*, 30(3), 507-512.

use crate::core::StatisticalError;
use chrono::NaiveDate;
use faer::{Col, Mat};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Direction of a fitted trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Immutable snapshot of a trend fit over one series.
#[derive(Debug, Clone, Serialize)]
pub struct TrendResult {
    /// Up/down when the slope is significant, stable otherwise.
    pub direction: TrendDirection,
    /// Slope of the OLS fit, in value units per period.
    pub velocity: f64,
    /// Slope as a percentage of the series mean (NaN when the mean is 0).
    pub velocity_pct: f64,
    /// Coefficient of determination of the fit.
    pub r_squared: f64,
    /// Two-sided p-value for the slope.
    pub p_value: f64,
    /// Ordered indices where the underlying level shifts; each index is the
    /// first observation of the new regime.
    pub changepoints: Vec<usize>,
}

/// Simple linear fit of y on x, kept internal to the trend module.
#[derive(Debug, Clone)]
pub(crate) struct OlsFit {
    pub intercept: f64,
    pub slope: f64,
    pub slope_se: f64,
    pub r_squared: f64,
    /// Residual standard error, √(RSS / (n−2)).
    pub residual_se: f64,
    /// Residual degrees of freedom, n − 2.
    pub df: f64,
}

/// Fit y = a + b·x by OLS. Requires at least 3 observations and
/// non-constant x.
pub(crate) fn ols_fit(x: &[f64], y: &[f64]) -> Result<OlsFit, StatisticalError> {
    let n = x.len();
    if n < 3 {
        return Err(StatisticalError::InsufficientData { needed: 3, got: n });
    }

    let design = Mat::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let yv = Col::from_fn(n, |i| y[i]);

    let xtx = design.transpose() * &design;
    let det = xtx[(0, 0)] * xtx[(1, 1)] - xtx[(0, 1)] * xtx[(1, 0)];
    if det.abs() <= f64::EPSILON * xtx[(0, 0)].max(xtx[(1, 1)]) {
        // x is (numerically) constant.
        return Err(StatisticalError::ZeroVariance);
    }
    let inv = [
        [xtx[(1, 1)] / det, -xtx[(0, 1)] / det],
        [-xtx[(1, 0)] / det, xtx[(0, 0)] / det],
    ];

    let xty = design.transpose() * &yv;
    let intercept = inv[0][0] * xty[0] + inv[0][1] * xty[1];
    let slope = inv[1][0] * xty[0] + inv[1][1] * xty[1];

    let mut rss = 0.0;
    let mut tss = 0.0;
    let y_mean = y.iter().sum::<f64>() / n as f64;
    for i in 0..n {
        let fitted = intercept + slope * x[i];
        rss += (y[i] - fitted).powi(2);
        tss += (y[i] - y_mean).powi(2);
    }

    let df = (n - 2) as f64;
    let sigma2 = rss / df;
    Ok(OlsFit {
        intercept,
        slope,
        slope_se: (sigma2 * inv[1][1]).max(0.0).sqrt(),
        r_squared: if tss > 0.0 { 1.0 - rss / tss } else { 0.0 },
        residual_se: sigma2.sqrt(),
        df,
    })
}

/// Configurable trend detector.
///
/// # Example
///
/// ```rust,ignore
/// use rice_analytics::trend::TrendDetector;
///
/// let series = [10.0, 12.0, 13.0, 15.0, 18.0, 19.0, 22.0];
/// let result = TrendDetector::builder()
///     .significance_level(0.05)
///     .build()
///     .detect(&series, None)?;
/// assert_eq!(result.direction, TrendDirection::Up);
/// ```
#[derive(Debug, Clone)]
pub struct TrendDetector {
    /// Significance level for calling a slope up/down.
    significance_level: f64,
    /// Minimum observations on each side of a changepoint.
    min_segment: usize,
    /// Minimum relative SSE reduction for accepting a changepoint.
    min_gain: f64,
}

impl TrendDetector {
    /// Detector with the default 0.05 significance level.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring the detector.
    pub fn builder() -> TrendDetectorBuilder {
        TrendDetectorBuilder::default()
    }

    /// Fit a trend to `data`, optionally against calendar dates.
    ///
    /// With `dates`, the x axis is day offsets from the first date, so the
    /// velocity is per day. Fails with
    /// [`StatisticalError::InsufficientData`] for fewer than 3 observations
    /// and [`StatisticalError::LengthMismatch`] when `dates` has a
    /// different length than `data`.
    pub fn detect(
        &self,
        data: &[f64],
        dates: Option<&[NaiveDate]>,
    ) -> Result<TrendResult, StatisticalError> {
        let x: Vec<f64> = match dates {
            Some(dates) => {
                if dates.len() != data.len() {
                    return Err(StatisticalError::LengthMismatch {
                        left: data.len(),
                        right: dates.len(),
                    });
                }
                if dates.is_empty() {
                    return Err(StatisticalError::EmptyData);
                }
                let origin = dates[0];
                dates
                    .iter()
                    .map(|d| (*d - origin).num_days() as f64)
                    .collect()
            }
            None => (0..data.len()).map(|i| i as f64).collect(),
        };

        let fit = ols_fit(&x, data)?;

        let p_value = if fit.slope_se > 0.0 {
            let t = fit.slope / fit.slope_se;
            StudentsT::new(0.0, 1.0, fit.df)
                .ok()
                .map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t.abs())))
        } else if fit.slope == 0.0 {
            1.0
        } else {
            // Perfect fit with nonzero slope.
            0.0
        };

        let direction = if p_value < self.significance_level {
            if fit.slope > 0.0 {
                TrendDirection::Up
            } else {
                TrendDirection::Down
            }
        } else {
            TrendDirection::Stable
        };

        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let velocity_pct = if mean != 0.0 {
            100.0 * fit.slope / mean
        } else {
            f64::NAN
        };

        let mut changepoints = Vec::new();
        self.segment(data, 0, &mut changepoints);
        changepoints.sort_unstable();

        Ok(TrendResult {
            direction,
            velocity: fit.slope,
            velocity_pct,
            r_squared: fit.r_squared,
            p_value,
            changepoints,
        })
    }

    /// Recursive binary segmentation on segment SSE.
    fn segment(&self, data: &[f64], offset: usize, out: &mut Vec<usize>) {
        let n = data.len();
        if n < 2 * self.min_segment {
            return;
        }

        let total = sse(data);
        if total <= 0.0 {
            return;
        }

        let mut best_split = 0;
        let mut best_sse = f64::INFINITY;
        for k in self.min_segment..=(n - self.min_segment) {
            let split_sse = sse(&data[..k]) + sse(&data[k..]);
            if split_sse < best_sse {
                best_sse = split_sse;
                best_split = k;
            }
        }

        if (total - best_sse) / total >= self.min_gain {
            out.push(offset + best_split);
            self.segment(&data[..best_split], offset, out);
            self.segment(&data[best_split..], offset + best_split, out);
        }
    }
}

impl Default for TrendDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn sse(data: &[f64]) -> f64 {
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    data.iter().map(|&v| (v - mean).powi(2)).sum()
}

/// Builder for [`TrendDetector`].
#[derive(Debug, Clone)]
pub struct TrendDetectorBuilder {
    significance_level: f64,
    min_segment: usize,
    min_gain: f64,
}

impl Default for TrendDetectorBuilder {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_segment: 5,
            min_gain: 0.15,
        }
    }
}

impl TrendDetectorBuilder {
    /// Significance level for the slope test. Default 0.05.
    pub fn significance_level(mut self, level: f64) -> Self {
        self.significance_level = level;
        self
    }

    /// Minimum observations on each side of a changepoint. Default 5.
    pub fn min_segment(mut self, min: usize) -> Self {
        self.min_segment = min.max(1);
        self
    }

    /// Minimum relative SSE reduction to accept a changepoint. Default 0.15.
    pub fn min_gain(mut self, gain: f64) -> Self {
        self.min_gain = gain;
        self
    }

    /// Build the detector.
    pub fn build(self) -> TrendDetector {
        TrendDetector {
            significance_level: self.significance_level,
            min_segment: self.min_segment,
            min_gain: self.min_gain,
        }
    }
}
