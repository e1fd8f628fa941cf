//! Ranked, filterable view over scored items.
//!
//! A [`PriorityQueue`] owns a collection of [`ScoredItem`] and exposes
//! ranking and filtering operations that return new queues; the receiver is
//! never mutated. Export operations serialize the current view.
//!
//! The CSV schema is a contract: the header is
//! `id,reach,impact,confidence,effort,score,normalized_score,tier,category`
//! with empty fields for an absent normalized score or tier, and
//! [`PriorityQueue::from_csv`] reconstructs an equivalent queue from it.

use crate::core::ExportError;
use crate::scoring::rice::{Category, Impact, ScoredItem, Tier};
use crate::stats::{describe, DescriptiveStats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Sort key for [`PriorityQueue::rank_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    Score,
    /// Items without a normalized score sort below every scored one.
    NormalizedScore,
    Reach,
    Confidence,
    Effort,
    Id,
}

/// Aggregate view of a queue's current contents.
#[derive(Debug, Clone, Serialize)]
pub struct QueueSummary {
    /// Number of items in the view.
    pub count: usize,
    /// Item count per assigned tier; unassigned items are absent.
    pub tiers: BTreeMap<Tier, usize>,
    /// Item count per category.
    pub categories: BTreeMap<Category, usize>,
    /// Distribution of the raw scores; `None` for an empty view.
    pub scores: Option<DescriptiveStats>,
}

const CSV_HEADER: [&str; 9] = [
    "id",
    "reach",
    "impact",
    "confidence",
    "effort",
    "score",
    "normalized_score",
    "tier",
    "category",
];

/// An ordered collection of scored items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriorityQueue {
    items: Vec<ScoredItem>,
}

impl PriorityQueue {
    /// Build a queue from already-scored items.
    pub fn new(items: Vec<ScoredItem>) -> Self {
        Self { items }
    }

    /// The items in the current view, in order.
    pub fn items(&self) -> &[ScoredItem] {
        &self.items
    }

    /// Number of items in the view.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the view is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Return a new queue sorted by `key`.
    ///
    /// The sort is stable: items with equal keys keep their current
    /// relative order.
    pub fn rank_by(&self, key: RankKey, ascending: bool) -> Self {
        let mut items = self.items.clone();
        items.sort_by(|a, b| {
            let ord = match key {
                RankKey::Id => a.id.cmp(&b.id),
                _ => {
                    let value = |item: &ScoredItem| match key {
                        RankKey::Score => item.score,
                        RankKey::NormalizedScore => {
                            item.normalized_score.unwrap_or(f64::NEG_INFINITY)
                        }
                        RankKey::Reach => item.reach,
                        RankKey::Confidence => item.confidence,
                        RankKey::Effort => item.effort,
                        RankKey::Id => unreachable!(),
                    };
                    value(a).total_cmp(&value(b))
                }
            };
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        Self { items }
    }

    /// Items with score ≥ `score_threshold` and effort ≤ `effort_threshold`.
    pub fn quick_wins(&self, score_threshold: f64, effort_threshold: f64) -> Self {
        self.filtered(|item| item.score >= score_threshold && item.effort <= effort_threshold)
    }

    /// Items with confidence ≥ `min_confidence`.
    pub fn filter_by_confidence(&self, min_confidence: f64) -> Self {
        self.filtered(|item| item.confidence >= min_confidence)
    }

    /// Items assigned exactly the given tier.
    pub fn get_tier(&self, tier: Tier) -> Self {
        self.filtered(|item| item.tier == Some(tier))
    }

    fn filtered<F: Fn(&ScoredItem) -> bool>(&self, keep: F) -> Self {
        Self {
            items: self.items.iter().filter(|i| keep(i)).cloned().collect(),
        }
    }

    /// Aggregate counts and score statistics over the current view.
    pub fn summary(&self) -> QueueSummary {
        let mut tiers = BTreeMap::new();
        let mut categories = BTreeMap::new();
        for item in &self.items {
            if let Some(tier) = item.tier {
                *tiers.entry(tier).or_insert(0) += 1;
            }
            *categories.entry(item.category).or_insert(0) += 1;
        }

        let scores: Vec<f64> = self.items.iter().map(|i| i.score).collect();
        QueueSummary {
            count: self.items.len(),
            tiers,
            categories,
            scores: describe(&scores).ok(),
        }
    }

    /// Serialize the current view as CSV.
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for item in &self.items {
            writer.write_record([
                item.id.clone(),
                item.reach.to_string(),
                item.impact.value().to_string(),
                item.confidence.to_string(),
                item.effort.to_string(),
                item.score.to_string(),
                item.normalized_score.map_or(String::new(), |v| v.to_string()),
                item.tier.map_or(String::new(), |t| t.to_string()),
                item.category.to_string(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    /// Reconstruct a queue from CSV produced by [`PriorityQueue::to_csv`].
    ///
    /// Scores are parsed back, not recomputed, so the round trip preserves
    /// them bit for bit.
    pub fn from_csv(text: &str) -> Result<Self, ExportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let mut items = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let row = idx + 1;

            let field = |i: usize, name: &'static str| -> Result<&str, ExportError> {
                record.get(i).ok_or(ExportError::Parse {
                    row,
                    field: name,
                    message: "missing field".to_string(),
                })
            };
            let number = |i: usize, name: &'static str| -> Result<f64, ExportError> {
                field(i, name)?
                    .parse::<f64>()
                    .map_err(|e| ExportError::Parse {
                        row,
                        field: name,
                        message: e.to_string(),
                    })
            };

            let impact = Impact::try_from(number(2, "impact")?)?;
            let normalized_score = match field(6, "normalized_score")? {
                "" => None,
                s => Some(s.parse::<f64>().map_err(|e| ExportError::Parse {
                    row,
                    field: "normalized_score",
                    message: e.to_string(),
                })?),
            };
            let tier = match field(7, "tier")? {
                "" => None,
                s => Some(s.parse::<Tier>().map_err(|message| ExportError::Parse {
                    row,
                    field: "tier",
                    message,
                })?),
            };
            let category = field(8, "category")?
                .parse::<Category>()
                .map_err(|message| ExportError::Parse {
                    row,
                    field: "category",
                    message,
                })?;

            items.push(ScoredItem {
                id: field(0, "id")?.to_string(),
                reach: number(1, "reach")?,
                impact,
                confidence: number(3, "confidence")?,
                effort: number(4, "effort")?,
                score: number(5, "score")?,
                normalized_score,
                tier,
                category,
            });
        }
        Ok(Self { items })
    }

    /// Serialize the current view as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.items)?)
    }

    /// Render the current view as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("| ID | Reach | Impact | Confidence | Effort | Score | Tier | Category |\n");
        out.push_str("|----|-------|--------|------------|--------|-------|------|----------|\n");
        for item in &self.items {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} | {:.2} | {} | {} |\n",
                item.id,
                item.reach,
                item.impact,
                item.confidence,
                item.effort,
                item.score,
                item.tier.map_or("-".to_string(), |t| t.to_string()),
                item.category,
            ));
        }
        out
    }

    /// Write the CSV export to a file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let csv = self.to_csv()?;
        std::fs::write(&path, csv)?;
        debug!(path = %path.as_ref().display(), items = self.items.len(), "wrote csv export");
        Ok(())
    }

    /// Write the JSON export to a file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        debug!(path = %path.as_ref().display(), items = self.items.len(), "wrote json export");
        Ok(())
    }

    /// Write the Markdown export to a file.
    pub fn write_markdown<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        std::fs::write(&path, self.to_markdown())?;
        debug!(path = %path.as_ref().display(), items = self.items.len(), "wrote markdown export");
        Ok(())
    }
}
