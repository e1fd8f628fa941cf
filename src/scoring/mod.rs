//! RICE scoring and the priority queue over scored items.

mod impute;
mod queue;
mod rice;

pub use impute::{impute_missing, ImputeStrategy};
pub use queue::{PriorityQueue, QueueSummary, RankKey};
pub use rice::{Category, Impact, RiceInput, RiceScorer, RiceScorerBuilder, ScoredItem, Tier};
