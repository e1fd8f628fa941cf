//! Core types shared across the analysis modules.

mod error;
mod rank;
mod table;

pub use error::{ExportError, StatisticalError, ValidationError};
pub use rank::{average_ranks, tie_group_sizes};
pub use table::{Column, DataTable};
