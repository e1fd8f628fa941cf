//! Missing-value imputation over a [`DataTable`].

use crate::core::{DataTable, ValidationError};
use crate::stats::percentile_sorted;
use std::str::FromStr;
use tracing::debug;

/// How to fill a missing cell from the observed values in its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputeStrategy {
    /// Column median.
    Median,
    /// Column mean.
    Mean,
    /// Most frequent observed value; ties break to the smallest.
    Mode,
}

impl FromStr for ImputeStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            "mode" => Ok(Self::Mode),
            other => Err(ValidationError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Fill every missing cell in `table` from its column's observed values.
///
/// Returns a new table; the input is untouched. Fails with
/// [`ValidationError::EmptyColumn`] when a column that has missing cells has
/// no observed values at all.
pub fn impute_missing(
    table: &DataTable,
    strategy: ImputeStrategy,
) -> Result<DataTable, ValidationError> {
    let mut out = table.clone();

    for column in table.columns() {
        let n_missing = column.values().iter().filter(|v| v.is_none()).count();
        if n_missing == 0 {
            continue;
        }

        let observed = column.observed();
        if observed.is_empty() {
            return Err(ValidationError::EmptyColumn(column.name().to_string()));
        }

        let fill = match strategy {
            ImputeStrategy::Median => {
                let mut sorted = observed;
                sorted.sort_by(f64::total_cmp);
                percentile_sorted(&sorted, 50.0)
            }
            ImputeStrategy::Mean => observed.iter().sum::<f64>() / observed.len() as f64,
            ImputeStrategy::Mode => mode(&observed),
        };

        let filled: Vec<Option<f64>> = column
            .values()
            .iter()
            .map(|v| Some(v.unwrap_or(fill)))
            .collect();
        debug!(
            column = column.name(),
            n_missing, fill, "imputed missing values"
        );
        out.replace_column(column.name(), filled)?;
    }

    Ok(out)
}

/// Most frequent value; on a tie, the smallest of the tied values.
fn mode(observed: &[f64]) -> f64 {
    let mut sorted = observed.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut best = sorted[0];
    let mut best_count = 0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let count = j - i + 1;
        if count > best_count {
            best_count = count;
            best = sorted[i];
        }
        i = j + 1;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_gap() -> DataTable {
        DataTable::new()
            .with_optional_column("reach", vec![Some(10.0), None, Some(30.0), Some(20.0)])
            .unwrap()
            .with_column("effort", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
    }

    #[test]
    fn test_median_fill() {
        let imputed = impute_missing(&table_with_gap(), ImputeStrategy::Median).unwrap();
        // Median of {10, 30, 20} is 20.
        assert_eq!(imputed.column("reach").unwrap().values()[1], Some(20.0));
        // Complete columns are untouched.
        assert_eq!(
            imputed.column("effort").unwrap().values(),
            table_with_gap().column("effort").unwrap().values()
        );
    }

    #[test]
    fn test_mean_fill() {
        let imputed = impute_missing(&table_with_gap(), ImputeStrategy::Mean).unwrap();
        assert_eq!(imputed.column("reach").unwrap().values()[1], Some(20.0));
    }

    #[test]
    fn test_mode_fill_prefers_most_frequent() {
        let table = DataTable::new()
            .with_optional_column(
                "impact",
                vec![Some(2.0), Some(2.0), Some(0.5), None, Some(3.0)],
            )
            .unwrap();
        let imputed = impute_missing(&table, ImputeStrategy::Mode).unwrap();
        assert_eq!(imputed.column("impact").unwrap().values()[3], Some(2.0));
    }

    #[test]
    fn test_mode_tie_breaks_small() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), 1.0);
    }

    #[test]
    fn test_entirely_missing_column_rejected() {
        let table = DataTable::new()
            .with_optional_column("reach", vec![None, None])
            .unwrap();
        let err = impute_missing(&table, ImputeStrategy::Median).unwrap_err();
        assert_eq!(err, ValidationError::EmptyColumn("reach".to_string()));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("median".parse::<ImputeStrategy>().unwrap(), ImputeStrategy::Median);
        assert_eq!("Mean".parse::<ImputeStrategy>().unwrap(), ImputeStrategy::Mean);
        let err = "zero-fill".parse::<ImputeStrategy>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownStrategy("zero-fill".to_string()));
    }
}
