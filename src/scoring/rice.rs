//! RICE prioritization scoring.
//!
//! The RICE score of an item is `reach × impact × (confidence / 100) /
//! effort`. Reach and confidence are percentages in [0, 100], impact is one
//! of five discrete levels, and effort is a strictly positive number of
//! person-weeks. No rounding is applied; display precision is a caller
//! concern.
//!
//! Batch scoring can rescale scores linearly onto [0, 100] across the batch
//! and derive a coarse priority tier (P0-P3) from the rescaled score. A
//! degenerate batch whose scores all coincide (including a batch of one)
//! normalizes to 100 for every item.

use crate::core::{DataTable, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Discrete impact level of an item.
///
/// The five levels are the only valid impact values; arbitrary multipliers
/// are rejected so that scores stay comparable across items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Impact {
    /// 0.25×
    Minimal,
    /// 0.5×
    Low,
    /// 1×
    Medium,
    /// 2×
    High,
    /// 3×
    Massive,
}

impl Impact {
    /// The numeric multiplier for this level.
    pub fn value(self) -> f64 {
        match self {
            Self::Minimal => 0.25,
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 2.0,
            Self::Massive => 3.0,
        }
    }
}

impl TryFrom<f64> for Impact {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        const EPS: f64 = 1e-9;
        for level in [
            Self::Minimal,
            Self::Low,
            Self::Medium,
            Self::High,
            Self::Massive,
        ] {
            if (value - level.value()).abs() < EPS {
                return Ok(level);
            }
        }
        Err(ValidationError::InvalidImpact(value))
    }
}

impl From<Impact> for f64 {
    fn from(impact: Impact) -> Self {
        impact.value()
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Coarse priority bucket derived from the normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    /// Normalized score ≥ 75.
    P0,
    /// Normalized score ≥ 50.
    P1,
    /// Normalized score ≥ 25.
    P2,
    /// Normalized score < 25.
    P3,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::P0 => write!(f, "P0"),
            Self::P1 => write!(f, "P1"),
            Self::P2 => write!(f, "P2"),
            Self::P3 => write!(f, "P3"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" => Ok(Self::P0),
            "P1" => Ok(Self::P1),
            "P2" => Ok(Self::P2),
            "P3" => Ok(Self::P3),
            other => Err(format!("unknown tier `{other}`")),
        }
    }
}

/// Score/effort quadrant of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// High score, low effort.
    #[serde(rename = "Quick Win")]
    QuickWin,
    /// High score, high effort.
    #[serde(rename = "Major Project")]
    MajorProject,
    /// Low score, low effort.
    #[serde(rename = "Incremental")]
    Incremental,
    /// Low score, high effort.
    #[serde(rename = "Time Sink")]
    TimeSink,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuickWin => write!(f, "Quick Win"),
            Self::MajorProject => write!(f, "Major Project"),
            Self::Incremental => write!(f, "Incremental"),
            Self::TimeSink => write!(f, "Time Sink"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Quick Win" => Ok(Self::QuickWin),
            "Major Project" => Ok(Self::MajorProject),
            "Incremental" => Ok(Self::Incremental),
            "Time Sink" => Ok(Self::TimeSink),
            other => Err(format!("unknown category `{other}`")),
        }
    }
}

/// One raw item to be scored.
#[derive(Debug, Clone, PartialEq)]
pub struct RiceInput {
    pub id: String,
    pub reach: f64,
    pub impact: f64,
    pub confidence: f64,
    pub effort: f64,
}

impl RiceInput {
    pub fn new<S: Into<String>>(
        id: S,
        reach: f64,
        impact: f64,
        confidence: f64,
        effort: f64,
    ) -> Self {
        Self {
            id: id.into(),
            reach,
            impact,
            confidence,
            effort,
        }
    }
}

/// A scored item.
///
/// Invariant: `score = reach × impact × (confidence / 100) / effort`.
/// `normalized_score` and `tier` are present only after batch scoring with
/// normalization/tier assignment enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: String,
    pub reach: f64,
    pub impact: Impact,
    pub confidence: f64,
    pub effort: f64,
    pub score: f64,
    pub normalized_score: Option<f64>,
    pub tier: Option<Tier>,
    pub category: Category,
}

/// RICE scorer with configurable tier and category cutoffs.
///
/// The defaults are the conventional ones: tiers at normalized score 75/50/25
/// and the Quick Win quadrant at score ≥ 50 with effort ≤ 2 person-weeks.
///
/// # Example
///
/// ```rust,ignore
/// use rice_analytics::scoring::RiceScorer;
///
/// let scorer = RiceScorer::new();
/// let item = scorer.calculate("search-revamp", 80.0, 2.0, 90.0, 4.0)?;
/// assert_eq!(item.score, 36.0);
/// ```
#[derive(Debug, Clone)]
pub struct RiceScorer {
    tier_cutoffs: [f64; 3],
    category_score_cutoff: f64,
    category_effort_cutoff: f64,
}

impl RiceScorer {
    /// Scorer with the default cutoffs.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for configuring cutoffs.
    pub fn builder() -> RiceScorerBuilder {
        RiceScorerBuilder::default()
    }

    /// Score one item.
    ///
    /// Fails with a [`ValidationError`] naming the offending field when
    /// reach ∉ [0, 100], impact is not one of the five levels, confidence ∉
    /// [0, 100], or effort ≤ 0.
    pub fn calculate<S: Into<String>>(
        &self,
        id: S,
        reach: f64,
        impact: f64,
        confidence: f64,
        effort: f64,
    ) -> Result<ScoredItem, ValidationError> {
        if !(0.0..=100.0).contains(&reach) || reach.is_nan() {
            return Err(ValidationError::ReachOutOfRange(reach));
        }
        let impact = Impact::try_from(impact)?;
        if !(0.0..=100.0).contains(&confidence) || confidence.is_nan() {
            return Err(ValidationError::ConfidenceOutOfRange(confidence));
        }
        if !(effort > 0.0) {
            return Err(ValidationError::NonPositiveEffort(effort));
        }

        let score = reach * impact.value() * (confidence / 100.0) / effort;
        Ok(ScoredItem {
            id: id.into(),
            reach,
            impact,
            confidence,
            effort,
            score,
            normalized_score: None,
            tier: None,
            category: self.categorize(score, effort),
        })
    }

    /// Score a batch of items.
    ///
    /// With `normalize`, scores are rescaled linearly onto [0, 100] across
    /// the batch and stored in `normalized_score`; a batch whose scores all
    /// coincide normalizes to 100. With `assign_tiers`, each item gets a
    /// [`Tier`] from its normalized score (computed internally even when
    /// `normalize` is off).
    pub fn score_batch(
        &self,
        items: &[RiceInput],
        normalize: bool,
        assign_tiers: bool,
    ) -> Result<Vec<ScoredItem>, ValidationError> {
        let mut scored: Vec<ScoredItem> = items
            .iter()
            .map(|item| {
                self.calculate(
                    item.id.clone(),
                    item.reach,
                    item.impact,
                    item.confidence,
                    item.effort,
                )
            })
            .collect::<Result<_, _>>()?;

        if (normalize || assign_tiers) && !scored.is_empty() {
            let min = scored.iter().map(|i| i.score).fold(f64::INFINITY, f64::min);
            let max = scored
                .iter()
                .map(|i| i.score)
                .fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;

            for item in &mut scored {
                // Zero-range batches (including a single item) pin to 100.
                let normalized = if range > 0.0 {
                    (item.score - min) / range * 100.0
                } else {
                    100.0
                };
                if normalize {
                    item.normalized_score = Some(normalized);
                }
                if assign_tiers {
                    item.tier = Some(self.tier_for(normalized));
                }
            }
        }

        debug!(
            items = scored.len(),
            normalize, assign_tiers, "scored RICE batch"
        );
        Ok(scored)
    }

    /// Score the rows of a table with columns `reach`, `impact`,
    /// `confidence`, and `effort`.
    ///
    /// Item ids are `item-1`, `item-2`, ... in row order. Missing cells are
    /// rejected; impute first. Fails with
    /// [`ValidationError::MissingColumn`] when a required column is absent.
    pub fn score_table(
        &self,
        table: &DataTable,
        normalize: bool,
        assign_tiers: bool,
    ) -> Result<Vec<ScoredItem>, ValidationError> {
        let column = |name: &str| -> Result<&[Option<f64>], ValidationError> {
            table
                .column(name)
                .map(|c| c.values())
                .ok_or_else(|| ValidationError::MissingColumn(name.to_string()))
        };
        let cell = |name: &str, values: &[Option<f64>], row: usize| {
            values[row].ok_or_else(|| ValidationError::MissingValue {
                column: name.to_string(),
                row,
            })
        };

        let reach = column("reach")?;
        let impact = column("impact")?;
        let confidence = column("confidence")?;
        let effort = column("effort")?;

        let mut inputs = Vec::with_capacity(table.n_rows());
        for row in 0..table.n_rows() {
            inputs.push(RiceInput::new(
                format!("item-{}", row + 1),
                cell("reach", reach, row)?,
                cell("impact", impact, row)?,
                cell("confidence", confidence, row)?,
                cell("effort", effort, row)?,
            ));
        }
        self.score_batch(&inputs, normalize, assign_tiers)
    }

    fn tier_for(&self, normalized: f64) -> Tier {
        if normalized >= self.tier_cutoffs[0] {
            Tier::P0
        } else if normalized >= self.tier_cutoffs[1] {
            Tier::P1
        } else if normalized >= self.tier_cutoffs[2] {
            Tier::P2
        } else {
            Tier::P3
        }
    }

    fn categorize(&self, score: f64, effort: f64) -> Category {
        let high_score = score >= self.category_score_cutoff;
        let low_effort = effort <= self.category_effort_cutoff;
        match (high_score, low_effort) {
            (true, true) => Category::QuickWin,
            (true, false) => Category::MajorProject,
            (false, true) => Category::Incremental,
            (false, false) => Category::TimeSink,
        }
    }
}

impl Default for RiceScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RiceScorer`].
#[derive(Debug, Clone)]
pub struct RiceScorerBuilder {
    tier_cutoffs: [f64; 3],
    category_score_cutoff: f64,
    category_effort_cutoff: f64,
}

impl Default for RiceScorerBuilder {
    fn default() -> Self {
        Self {
            tier_cutoffs: [75.0, 50.0, 25.0],
            category_score_cutoff: 50.0,
            category_effort_cutoff: 2.0,
        }
    }
}

impl RiceScorerBuilder {
    /// Normalized-score cutoffs for P0/P1/P2, highest first.
    /// Default [75, 50, 25].
    pub fn tier_cutoffs(mut self, p0: f64, p1: f64, p2: f64) -> Self {
        self.tier_cutoffs = [p0, p1, p2];
        self
    }

    /// Raw-score cutoff separating Quick Win/Major Project from
    /// Incremental/Time Sink. Default 50.
    pub fn category_score_cutoff(mut self, cutoff: f64) -> Self {
        self.category_score_cutoff = cutoff;
        self
    }

    /// Effort cutoff (person-weeks) separating the low-effort quadrants.
    /// Default 2.
    pub fn category_effort_cutoff(mut self, cutoff: f64) -> Self {
        self.category_effort_cutoff = cutoff;
        self
    }

    /// Build the scorer.
    pub fn build(self) -> RiceScorer {
        RiceScorer {
            tier_cutoffs: self.tier_cutoffs,
            category_score_cutoff: self.category_score_cutoff,
            category_effort_cutoff: self.category_effort_cutoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_scores() {
        let scorer = RiceScorer::new();
        let item = scorer.calculate("a", 80.0, 2.0, 90.0, 4.0).unwrap();
        assert_eq!(item.score, 36.0);
        let item = scorer.calculate("b", 50.0, 0.5, 100.0, 1.0).unwrap();
        assert_eq!(item.score, 25.0);
        let item = scorer.calculate("c", 100.0, 3.0, 80.0, 8.0).unwrap();
        assert_eq!(item.score, 30.0);
    }

    #[test]
    fn test_reach_out_of_range() {
        let err = RiceScorer::new()
            .calculate("a", 150.0, 1.0, 50.0, 1.0)
            .unwrap_err();
        assert_eq!(err.to_string(), "reach must be 0-100, got 150");
    }

    #[test]
    fn test_impact_must_be_discrete_level() {
        let scorer = RiceScorer::new();
        // 1.5 lies between two valid levels and is rejected.
        let err = scorer.calculate("a", 50.0, 1.5, 50.0, 1.0).unwrap_err();
        assert_eq!(err, ValidationError::InvalidImpact(1.5));
        // All five defined levels are accepted.
        for impact in [0.25, 0.5, 1.0, 2.0, 3.0] {
            assert!(scorer.calculate("a", 50.0, impact, 50.0, 1.0).is_ok());
        }
    }

    #[test]
    fn test_effort_must_be_positive() {
        let scorer = RiceScorer::new();
        assert!(matches!(
            scorer.calculate("a", 50.0, 1.0, 50.0, 0.0),
            Err(ValidationError::NonPositiveEffort(_))
        ));
        assert!(matches!(
            scorer.calculate("a", 50.0, 1.0, 50.0, -1.0),
            Err(ValidationError::NonPositiveEffort(_))
        ));
    }

    #[test]
    fn test_confidence_bounds() {
        let scorer = RiceScorer::new();
        assert!(scorer.calculate("a", 50.0, 1.0, 0.0, 1.0).is_ok());
        assert!(scorer.calculate("a", 50.0, 1.0, 100.0, 1.0).is_ok());
        assert!(scorer.calculate("a", 50.0, 1.0, 100.1, 1.0).is_err());
    }

    #[test]
    fn test_batch_normalization_bounds() {
        let scorer = RiceScorer::new();
        let items = vec![
            RiceInput::new("low", 10.0, 0.25, 50.0, 5.0),
            RiceInput::new("mid", 50.0, 1.0, 80.0, 2.0),
            RiceInput::new("high", 100.0, 3.0, 100.0, 1.0),
        ];
        let scored = scorer.score_batch(&items, true, true).unwrap();
        assert_eq!(scored[0].normalized_score, Some(0.0));
        assert_eq!(scored[2].normalized_score, Some(100.0));
        assert_eq!(scored[2].tier, Some(Tier::P0));
        assert_eq!(scored[0].tier, Some(Tier::P3));
    }

    #[test]
    fn test_single_item_batch_normalizes_to_100() {
        let scorer = RiceScorer::new();
        let items = vec![RiceInput::new("only", 50.0, 1.0, 50.0, 1.0)];
        let scored = scorer.score_batch(&items, true, true).unwrap();
        assert_eq!(scored[0].normalized_score, Some(100.0));
        assert_eq!(scored[0].tier, Some(Tier::P0));
    }

    #[test]
    fn test_identical_scores_all_normalize_to_100() {
        let scorer = RiceScorer::new();
        let items = vec![
            RiceInput::new("a", 40.0, 1.0, 50.0, 1.0),
            RiceInput::new("b", 40.0, 1.0, 50.0, 1.0),
            RiceInput::new("c", 40.0, 1.0, 50.0, 1.0),
        ];
        let scored = scorer.score_batch(&items, true, false).unwrap();
        for item in &scored {
            assert_eq!(item.normalized_score, Some(100.0));
        }
    }

    #[test]
    fn test_batch_matches_elementwise() {
        let scorer = RiceScorer::new();
        let items = vec![
            RiceInput::new("a", 80.0, 2.0, 90.0, 4.0),
            RiceInput::new("b", 50.0, 0.5, 100.0, 1.0),
        ];
        let scored = scorer.score_batch(&items, false, false).unwrap();
        for (input, item) in items.iter().zip(&scored) {
            let single = scorer
                .calculate(
                    input.id.clone(),
                    input.reach,
                    input.impact,
                    input.confidence,
                    input.effort,
                )
                .unwrap();
            assert_eq!(single.score, item.score);
        }
    }

    #[test]
    fn test_category_quadrants() {
        let scorer = RiceScorer::new();
        // score 90, effort 1 => Quick Win
        let item = scorer.calculate("a", 90.0, 2.0, 50.0, 1.0).unwrap();
        assert_eq!(item.category, Category::QuickWin);
        // score 54, effort 5 => Major Project
        let item = scorer.calculate("b", 90.0, 3.0, 100.0, 5.0).unwrap();
        assert_eq!(item.category, Category::MajorProject);
        // score 12.5, effort 2 => Incremental
        let item = scorer.calculate("c", 50.0, 0.5, 100.0, 2.0).unwrap();
        assert_eq!(item.category, Category::Incremental);
        // score 5, effort 10 => Time Sink
        let item = scorer.calculate("d", 100.0, 1.0, 50.0, 10.0).unwrap();
        assert_eq!(item.category, Category::TimeSink);
    }

    #[test]
    fn test_batch_error_propagates() {
        let scorer = RiceScorer::new();
        let items = vec![
            RiceInput::new("ok", 50.0, 1.0, 50.0, 1.0),
            RiceInput::new("bad", 50.0, 1.7, 50.0, 1.0),
        ];
        assert!(scorer.score_batch(&items, true, true).is_err());
    }
}
