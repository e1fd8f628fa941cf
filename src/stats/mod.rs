//! Descriptive statistics, hypothesis testing, correlation, and outlier
//! detection over in-memory numeric sequences.
//!
//! All functions are pure: they never mutate their input and hold no state
//! between calls.

mod correlation;
mod descriptive;
mod normality;
mod outliers;
mod testing;

pub use correlation::{correlate, CorrelationMethod, CorrelationResult};
pub use descriptive::{describe, percentile, DescriptiveStats};
pub use normality::check_normality;
pub use outliers::{detect_outliers, OutlierMethod, OutlierResult};
pub use testing::{
    mann_whitney, paired_t_test, t_test, Alternative, HypothesisTestResult,
};

pub(crate) use descriptive::percentile_sorted;
