//! Error types shared across the crate.
//!
//! Two kinds of analysis failure are distinguished:
//!
//! - [`ValidationError`]: the caller supplied malformed or out-of-range input
//!   (bad RICE fields, an unknown imputation strategy, a non-positive forecast
//!   horizon). These are caller bugs and are reported immediately.
//! - [`StatisticalError`]: the requested computation is mathematically
//!   undefined or statistically unreliable for the data provided (too few
//!   samples, mismatched series lengths, zero variance). These are never
//!   silently downgraded to a default value.
//!
//! [`ExportError`] covers serialization and file I/O failures in the priority
//! queue's export/import paths.

use thiserror::Error;

/// Malformed or out-of-range input supplied by the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Reach must lie in [0, 100].
    #[error("reach must be 0-100, got {0}")]
    ReachOutOfRange(f64),

    /// Impact must be one of the five discrete levels.
    #[error("impact must be one of 0.25, 0.5, 1.0, 2.0, 3.0, got {0}")]
    InvalidImpact(f64),

    /// Confidence must lie in [0, 100].
    #[error("confidence must be 0-100, got {0}")]
    ConfidenceOutOfRange(f64),

    /// Effort must be strictly positive.
    #[error("effort must be strictly positive, got {0}")]
    NonPositiveEffort(f64),

    /// Imputation strategy string was not recognized.
    #[error("unknown imputation strategy `{0}`, expected one of: median, mean, mode")]
    UnknownStrategy(String),

    /// A column had no observed values to impute from.
    #[error("column `{0}` has no observed values")]
    EmptyColumn(String),

    /// A required column is absent from the table.
    #[error("required column `{0}` is missing")]
    MissingColumn(String),

    /// Columns in a table must all have the same length.
    #[error("column `{name}` has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A cell that scoring requires was missing; impute first.
    #[error("column `{column}` has a missing value at row {row}")]
    MissingValue { column: String, row: usize },

    /// Smoothing factor must lie in (0, 1].
    #[error("alpha must be in (0, 1], got {0}")]
    InvalidAlpha(f64),

    /// Forecast horizon must be at least one period.
    #[error("periods must be greater than zero")]
    InvalidPeriods,

    /// Confidence level must lie strictly between 0 and 1.
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),

    /// Moving-average window must be at least one observation.
    #[error("window must be greater than zero")]
    ZeroWindow,
}

/// Mathematically undefined or statistically unreliable operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatisticalError {
    /// The input sequence was empty.
    #[error("input data is empty")]
    EmptyData,

    /// Fewer observations than the operation requires.
    #[error("need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A two-sample test was given an undersized group.
    #[error("each group must have at least {needed} samples, got {got_a} and {got_b}")]
    GroupTooSmall {
        needed: usize,
        got_a: usize,
        got_b: usize,
    },

    /// Paired series or correlated series must have equal length.
    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// The input has no variance, so the statistic is undefined.
    #[error("input has zero variance")]
    ZeroVariance,

    /// Moving-average window exceeds the series length.
    #[error("window {window} exceeds series length {len}")]
    WindowTooLarge { window: usize, len: usize },
}

/// Failure while exporting or importing a priority queue view.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A field in an imported CSV row could not be parsed.
    #[error("row {row}: invalid `{field}`: {message}")]
    Parse {
        row: usize,
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
