//! Trend Detection and Forecasting Tests
//!
//! Covers direction classification against the significance level,
//! changepoint placement, velocity units with a date axis, and the
//! forecast confidence-bound contract.

use chrono::NaiveDate;
use rice_analytics::core::{StatisticalError, ValidationError};
use rice_analytics::trend::{
    exponential_smoothing, forecast, moving_average, ForecastMethod, TrendDetector,
    TrendDirection, TrendInputError,
};

// =============================================================================
// Direction Classification
// =============================================================================

#[test]
fn test_noisy_upward_trend_detected() {
    let data: Vec<f64> = (0..30)
        .map(|i| 10.0 + 1.5 * i as f64 + if i % 3 == 0 { 2.0 } else { -1.0 })
        .collect();
    let result = TrendDetector::new().detect(&data, None).unwrap();
    assert_eq!(result.direction, TrendDirection::Up);
    assert!(result.velocity > 1.0 && result.velocity < 2.0);
    assert!(result.r_squared > 0.95);
}

#[test]
fn test_pure_noise_is_stable() {
    // Deterministic zig-zag with no drift.
    let data: Vec<f64> = (0..40)
        .map(|i| 50.0 + if i % 2 == 0 { 3.0 } else { -3.0 })
        .collect();
    let result = TrendDetector::new().detect(&data, None).unwrap();
    assert_eq!(result.direction, TrendDirection::Stable);
}

#[test]
fn test_stricter_significance_flips_to_stable() {
    // A weak drift under heavy noise: significant at 0.05 only if the
    // slope estimate is precise enough, never at 1e-12.
    let data: Vec<f64> = (0..25)
        .map(|i| 10.0 + 0.3 * i as f64 + if i % 2 == 0 { 4.0 } else { -4.0 })
        .collect();
    let strict = TrendDetector::builder()
        .significance_level(1e-12)
        .build()
        .detect(&data, None)
        .unwrap();
    assert_eq!(strict.direction, TrendDirection::Stable);
}

#[test]
fn test_velocity_pct_relative_to_mean() {
    let data: Vec<f64> = (0..20).map(|i| 100.0 + 2.0 * i as f64).collect();
    let result = TrendDetector::new().detect(&data, None).unwrap();
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    assert!((result.velocity_pct - 100.0 * 2.0 / mean).abs() < 1e-9);
}

#[test]
fn test_date_axis_velocity_per_day() {
    let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..12).map(|i| start + chrono::Duration::days(30 * i)).collect();
    // +6 per 30 days = +0.2/day.
    let data: Vec<f64> = (0..12).map(|i| 40.0 + 6.0 * i as f64).collect();
    let result = TrendDetector::new().detect(&data, Some(&dates)).unwrap();
    assert!((result.velocity - 0.2).abs() < 1e-9);
    assert_eq!(result.direction, TrendDirection::Up);
}

// =============================================================================
// Changepoints
// =============================================================================

#[test]
fn test_single_level_shift() {
    let mut data = vec![5.0; 20];
    data.extend(vec![25.0; 20]);
    let result = TrendDetector::new().detect(&data, None).unwrap();
    assert_eq!(result.changepoints, vec![20]);
}

#[test]
fn test_two_level_shifts() {
    let mut data = vec![0.0; 15];
    data.extend(vec![30.0; 15]);
    data.extend(vec![60.0; 15]);
    let result = TrendDetector::new().detect(&data, None).unwrap();
    assert_eq!(result.changepoints, vec![15, 30]);
}

#[test]
fn test_no_changepoints_in_smooth_line_under_strict_gain() {
    // The best split of a straight line removes 75% of its SSE, so a gain
    // threshold above that never segments a pure trend.
    let data: Vec<f64> = (0..40).map(|i| 2.0 * i as f64).collect();
    let strict = TrendDetector::builder()
        .min_gain(0.9)
        .build()
        .detect(&data, None)
        .unwrap();
    assert!(strict.changepoints.is_empty());
}

#[test]
fn test_changepoints_are_ordered() {
    let mut data = Vec::new();
    for level in [0.0, 40.0, 10.0, 80.0] {
        data.extend(vec![level; 12]);
    }
    let result = TrendDetector::new().detect(&data, None).unwrap();
    for pair in result.changepoints.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

// =============================================================================
// Smoothing
// =============================================================================

#[test]
fn test_moving_average_length_contract() {
    let data: Vec<f64> = (0..10).map(|i| i as f64).collect();
    for window in 1..=10 {
        let ma = moving_average(&data, window).unwrap();
        assert_eq!(ma.len(), data.len() - window + 1);
    }
}

#[test]
fn test_moving_average_window_errors() {
    assert!(matches!(
        moving_average(&[1.0, 2.0], 5),
        Err(TrendInputError::Statistical(
            StatisticalError::WindowTooLarge { window: 5, len: 2 }
        ))
    ));
    assert!(matches!(
        moving_average(&[1.0, 2.0], 0),
        Err(TrendInputError::Validation(ValidationError::ZeroWindow))
    ));
}

#[test]
fn test_smoothing_preserves_length_and_start() {
    let data = [4.0, 8.0, 2.0, 6.0, 10.0];
    let smoothed = exponential_smoothing(&data, 0.3).unwrap();
    assert_eq!(smoothed.len(), data.len());
    assert_eq!(smoothed[0], data[0]);
}

// =============================================================================
// Forecasting
// =============================================================================

#[test]
fn test_linear_forecast_continues_line() {
    let data: Vec<f64> = (0..15).map(|i| 7.0 + 1.5 * i as f64).collect();
    let result = forecast(&data, 5, ForecastMethod::Linear, 0.95).unwrap();
    assert_eq!(result.forecast.len(), 5);
    for (h, &point) in result.forecast.iter().enumerate() {
        let expected = 7.0 + 1.5 * (14 + h + 1) as f64;
        assert!((point - expected).abs() < 1e-9);
    }
}

#[test]
fn test_forecast_bounds_contain_point() {
    let data = [3.0, 5.0, 4.0, 6.0, 5.0, 7.0, 6.0, 8.0, 7.0, 9.0];
    for method in [ForecastMethod::Linear, ForecastMethod::Exponential { alpha: 0.4 }] {
        let result = forecast(&data, 3, method, 0.95).unwrap();
        for i in 0..3 {
            assert!(result.lower[i] <= result.forecast[i]);
            assert!(result.forecast[i] <= result.upper[i]);
        }
    }
}

#[test]
fn test_forecast_parameter_validation() {
    let data = [1.0, 2.0, 3.0, 4.0];
    assert!(matches!(
        forecast(&data, 0, ForecastMethod::Linear, 0.95),
        Err(TrendInputError::Validation(ValidationError::InvalidPeriods))
    ));
    assert!(matches!(
        forecast(&data, 2, ForecastMethod::Linear, 1.5),
        Err(TrendInputError::Validation(
            ValidationError::InvalidConfidenceLevel(_)
        ))
    ));
    assert!(matches!(
        forecast(&data, 2, ForecastMethod::Exponential { alpha: 0.0 }, 0.9),
        Err(TrendInputError::Validation(ValidationError::InvalidAlpha(_)))
    ));
}

#[test]
fn test_forecast_too_short_series() {
    assert!(matches!(
        forecast(&[1.0, 2.0], 1, ForecastMethod::Linear, 0.95),
        Err(TrendInputError::Statistical(
            StatisticalError::InsufficientData { .. }
        ))
    ));
}
