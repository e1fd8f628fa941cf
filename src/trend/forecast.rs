//! Forward projection with confidence bounds.
//!
//! Two methods are provided. `Linear` extrapolates the OLS line fitted to
//! the whole series; `Exponential` extrapolates the smoothed level plus the
//! mean step of the smoothed series (a Holt-style drift estimated once).
//! Either way the bounds are symmetric: point forecast ± quantile × residual
//! standard error, with the quantile taken from the t distribution for the
//! linear fit and the standard normal for the smoother.

use crate::core::{StatisticalError, ValidationError};
use crate::trend::detect::ols_fit;
use crate::trend::smoothing::exponential_smoothing;
use crate::trend::TrendInputError;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Extrapolation method for [`forecast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForecastMethod {
    /// Extrapolate the OLS line.
    Linear,
    /// Extrapolate the exponentially smoothed level with mean drift.
    Exponential {
        /// Smoothing factor in (0, 1].
        alpha: f64,
    },
}

/// Point forecasts with symmetric confidence bounds, one entry per period.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResult {
    /// Point forecasts for periods 1..=`periods` past the end of the data.
    pub forecast: Vec<f64>,
    /// Lower confidence bounds, parallel to `forecast`.
    pub lower: Vec<f64>,
    /// Upper confidence bounds, parallel to `forecast`.
    pub upper: Vec<f64>,
    /// Confidence level the bounds were built for.
    pub confidence: f64,
}

/// Forecast `periods` values past the end of `data`.
///
/// Fails with [`ValidationError::InvalidPeriods`] for a zero horizon,
/// [`ValidationError::InvalidConfidenceLevel`] unless
/// `0 < confidence < 1`, and [`StatisticalError::InsufficientData`] when
/// the series is too short for the chosen method (3 observations for
/// `Linear`, 2 for `Exponential`).
pub fn forecast(
    data: &[f64],
    periods: usize,
    method: ForecastMethod,
    confidence: f64,
) -> Result<ForecastResult, TrendInputError> {
    if periods == 0 {
        return Err(ValidationError::InvalidPeriods.into());
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(ValidationError::InvalidConfidenceLevel(confidence).into());
    }

    match method {
        ForecastMethod::Linear => linear_forecast(data, periods, confidence),
        ForecastMethod::Exponential { alpha } => {
            exponential_forecast(data, periods, alpha, confidence)
        }
    }
}

fn linear_forecast(
    data: &[f64],
    periods: usize,
    confidence: f64,
) -> Result<ForecastResult, TrendInputError> {
    let n = data.len();
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let fit = ols_fit(&x, data)?;

    let quantile = StudentsT::new(0.0, 1.0, fit.df)
        .ok()
        .map_or(f64::NAN, |d| {
            d.inverse_cdf(1.0 - (1.0 - confidence) / 2.0)
        });
    let margin = quantile * fit.residual_se;

    let mut out = ForecastResult {
        forecast: Vec::with_capacity(periods),
        lower: Vec::with_capacity(periods),
        upper: Vec::with_capacity(periods),
        confidence,
    };
    for h in 1..=periods {
        let point = fit.intercept + fit.slope * (n - 1 + h) as f64;
        out.forecast.push(point);
        out.lower.push(point - margin);
        out.upper.push(point + margin);
    }
    Ok(out)
}

fn exponential_forecast(
    data: &[f64],
    periods: usize,
    alpha: f64,
    confidence: f64,
) -> Result<ForecastResult, TrendInputError> {
    let n = data.len();
    if n < 2 {
        return Err(StatisticalError::InsufficientData { needed: 2, got: n }.into());
    }

    let smoothed = exponential_smoothing(data, alpha)?;
    let level = smoothed[n - 1];
    // Mean step of the smoothed series estimates the drift.
    let drift = (smoothed[n - 1] - smoothed[0]) / (n - 1) as f64;

    // One-step smoothing residuals give the error scale.
    let residual_var = data
        .iter()
        .zip(&smoothed)
        .map(|(&x, &s)| (x - s).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let residual_se = residual_var.sqrt();

    let quantile = Normal::new(0.0, 1.0)
        .ok()
        .map_or(f64::NAN, |d| d.inverse_cdf(1.0 - (1.0 - confidence) / 2.0));
    let margin = quantile * residual_se;

    let mut out = ForecastResult {
        forecast: Vec::with_capacity(periods),
        lower: Vec::with_capacity(periods),
        upper: Vec::with_capacity(periods),
        confidence,
    };
    for h in 1..=periods {
        let point = level + drift * h as f64;
        out.forecast.push(point);
        out.lower.push(point - margin);
        out.upper.push(point + margin);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_periods_rejected() {
        let err = forecast(&[1.0, 2.0, 3.0], 0, ForecastMethod::Linear, 0.95).unwrap_err();
        assert_eq!(err, ValidationError::InvalidPeriods.into());
    }

    #[test]
    fn test_bad_confidence_rejected() {
        assert!(forecast(&[1.0, 2.0, 3.0], 1, ForecastMethod::Linear, 0.0).is_err());
        assert!(forecast(&[1.0, 2.0, 3.0], 1, ForecastMethod::Linear, 1.0).is_err());
    }

    #[test]
    fn test_linear_extrapolates_exact_line() {
        let data: Vec<f64> = (0..10).map(|i| 2.0 + 3.0 * i as f64).collect();
        let result = forecast(&data, 3, ForecastMethod::Linear, 0.95).expect("should run");
        // Next values continue the line: 32, 35, 38.
        assert!((result.forecast[0] - 32.0).abs() < 1e-9);
        assert!((result.forecast[1] - 35.0).abs() < 1e-9);
        assert!((result.forecast[2] - 38.0).abs() < 1e-9);
        // A perfect fit has zero-width bounds.
        assert!((result.upper[0] - result.lower[0]).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_are_symmetric() {
        let data = [10.0, 12.0, 11.0, 14.0, 13.0, 16.0, 15.0, 18.0];
        let result = forecast(&data, 2, ForecastMethod::Linear, 0.9).expect("should run");
        for i in 0..2 {
            let mid = (result.upper[i] + result.lower[i]) / 2.0;
            assert!((mid - result.forecast[i]).abs() < 1e-9);
            assert!(result.upper[i] > result.lower[i]);
        }
    }

    #[test]
    fn test_exponential_forecast_level() {
        let data = [10.0; 12];
        let result = forecast(
            &data,
            4,
            ForecastMethod::Exponential { alpha: 0.5 },
            0.95,
        )
        .expect("should run");
        // Constant series: level 10, drift 0, zero-width bounds.
        for (i, &f) in result.forecast.iter().enumerate() {
            assert!((f - 10.0).abs() < 1e-9, "period {i}");
        }
        assert!((result.upper[0] - result.lower[0]).abs() < 1e-9);
    }

    #[test]
    fn test_exponential_invalid_alpha() {
        let err = forecast(
            &[1.0, 2.0, 3.0],
            1,
            ForecastMethod::Exponential { alpha: 2.0 },
            0.95,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidAlpha(2.0).into());
    }

    #[test]
    fn test_wider_confidence_gives_wider_bounds() {
        let data = [5.0, 7.0, 6.0, 9.0, 8.0, 11.0, 10.0, 13.0, 12.0, 15.0];
        let narrow = forecast(&data, 1, ForecastMethod::Linear, 0.80).expect("should run");
        let wide = forecast(&data, 1, ForecastMethod::Linear, 0.99).expect("should run");
        assert!(
            wide.upper[0] - wide.lower[0] > narrow.upper[0] - narrow.lower[0]
        );
    }
}
