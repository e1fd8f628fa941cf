//! Trend detection, smoothing, and forecasting over time series.

mod detect;
mod forecast;
mod smoothing;

pub use detect::{TrendDetector, TrendDetectorBuilder, TrendDirection, TrendResult};
pub use forecast::{forecast, ForecastMethod, ForecastResult};
pub use smoothing::{exponential_smoothing, moving_average};

use crate::core::{StatisticalError, ValidationError};

/// Either failure mode of the trend entry points, which validate caller
/// parameters and data sufficiency separately.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrendInputError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Statistical(#[from] StatisticalError),
}
