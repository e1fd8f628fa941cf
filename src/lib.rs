//! RICE prioritization scoring with statistical analysis support.
//!
//! This library computes RICE priority scores (Reach × Impact × Confidence /
//! Effort) over batches of items and provides the statistical toolkit that
//! usually accompanies prioritization work: descriptive statistics,
//! hypothesis tests, correlation analysis, outlier detection, and
//! trend/forecast functions for tracking metrics over time.
//!
//! All analysis functions are pure and synchronous: they never mutate their
//! inputs, hold no global state, and are safe to call concurrently. The only
//! stateful component is [`scoring::PriorityQueue`], which owns a ranked
//! view over scored items; its operations return new queues rather than
//! mutating in place.
//!
//! # Example
//!
//! ```rust,ignore
//! use rice_analytics::prelude::*;
//!
//! let scorer = RiceScorer::new();
//! let items = vec![
//!     RiceInput::new("search-revamp", 80.0, 2.0, 90.0, 4.0),
//!     RiceInput::new("dark-mode", 50.0, 0.5, 100.0, 1.0),
//! ];
//! let queue = PriorityQueue::new(scorer.score_batch(&items, true, true)?);
//!
//! let ranked = queue.rank_by(RankKey::Score, false);
//! println!("{}", ranked.to_markdown());
//! ```

pub mod core;
pub mod scoring;
pub mod stats;
pub mod trend;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{DataTable, ExportError, StatisticalError, ValidationError};
    pub use crate::scoring::{
        impute_missing, Category, Impact, ImputeStrategy, PriorityQueue, QueueSummary, RankKey,
        RiceInput, RiceScorer, ScoredItem, Tier,
    };
    pub use crate::stats::{
        check_normality, correlate, describe, detect_outliers, mann_whitney, paired_t_test,
        percentile, t_test, Alternative, CorrelationMethod, CorrelationResult, DescriptiveStats,
        HypothesisTestResult, OutlierMethod, OutlierResult,
    };
    pub use crate::trend::{
        exponential_smoothing, forecast, moving_average, ForecastMethod, ForecastResult,
        TrendDetector, TrendDirection, TrendResult,
    };
}

pub use crate::core::{DataTable, ExportError, StatisticalError, ValidationError};
pub use crate::scoring::{PriorityQueue, RiceInput, RiceScorer, ScoredItem};
