//! Moving averages and exponential smoothing.

use crate::core::{StatisticalError, ValidationError};
use crate::trend::TrendInputError;

/// Trailing moving average with the given window.
///
/// Returns `data.len() − window + 1` values, one per complete window.
/// Fails with [`ValidationError::ZeroWindow`] for a zero window and
/// [`StatisticalError::WindowTooLarge`] when the window exceeds the series.
pub fn moving_average(data: &[f64], window: usize) -> Result<Vec<f64>, TrendInputError> {
    if window == 0 {
        return Err(ValidationError::ZeroWindow.into());
    }
    if window > data.len() {
        return Err(StatisticalError::WindowTooLarge {
            window,
            len: data.len(),
        }
        .into());
    }

    let mut out = Vec::with_capacity(data.len() - window + 1);
    let mut sum: f64 = data[..window].iter().sum();
    out.push(sum / window as f64);
    for i in window..data.len() {
        sum += data[i] - data[i - window];
        out.push(sum / window as f64);
    }
    Ok(out)
}

/// Simple exponential smoothing with factor `alpha` ∈ (0, 1].
///
/// The smoothed series starts at the first observation:
/// `s₀ = x₀`, `sₜ = α·xₜ + (1 − α)·sₜ₋₁`.
pub fn exponential_smoothing(data: &[f64], alpha: f64) -> Result<Vec<f64>, TrendInputError> {
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(ValidationError::InvalidAlpha(alpha).into());
    }
    if data.is_empty() {
        return Err(StatisticalError::EmptyData.into());
    }

    let mut out = Vec::with_capacity(data.len());
    let mut level = data[0];
    out.push(level);
    for &x in &data[1..] {
        level = alpha * x + (1.0 - alpha) * level;
        out.push(level);
    }
    Ok(out)
}
