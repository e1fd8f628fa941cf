//! A small typed table: ordered columns of optional numeric values.
//!
//! Stands in for "DataFrame-like" input without pulling in a dataframe
//! library. Columns keep their insertion order; every column must have the
//! same number of rows. Missing cells are `None` and can be filled via
//! [`crate::scoring::impute_missing`].

use crate::core::error::ValidationError;

/// One named column of optional numeric observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Option<f64>>,
}

impl Column {
    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All cells, missing values included.
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Only the observed (non-missing) values, in row order.
    pub fn observed(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| *v).collect()
    }
}

/// An ordered collection of equal-length columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<Column>,
}

impl DataTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column of fully observed values.
    pub fn with_column<S: Into<String>>(
        self,
        name: S,
        values: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        self.with_optional_column(name, values.into_iter().map(Some).collect())
    }

    /// Append a column that may contain missing cells.
    pub fn with_optional_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<Option<f64>>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if let Some(first) = self.columns.first() {
            if first.values.len() != values.len() {
                return Err(ValidationError::ColumnLengthMismatch {
                    name,
                    expected: first.values.len(),
                    got: values.len(),
                });
            }
        }
        self.columns.push(Column { name, values });
        Ok(self)
    }

    /// Number of rows (0 for a table with no columns).
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Replace a column's cells, keeping its position. Used by imputation.
    pub(crate) fn replace_column(
        &mut self,
        name: &str,
        values: Vec<Option<f64>>,
    ) -> Result<(), ValidationError> {
        let n_rows = self.n_rows();
        if values.len() != n_rows {
            return Err(ValidationError::ColumnLengthMismatch {
                name: name.to_string(),
                expected: n_rows,
                got: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => {
                col.values = values;
                Ok(())
            }
            None => Err(ValidationError::MissingColumn(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_preserved() {
        let table = DataTable::new()
            .with_column("reach", vec![10.0, 20.0])
            .unwrap()
            .with_column("effort", vec![1.0, 2.0])
            .unwrap();

        assert_eq!(table.column_names(), vec!["reach", "effort"]);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = DataTable::new()
            .with_column("a", vec![1.0, 2.0])
            .unwrap()
            .with_column("b", vec![1.0]);

        assert!(matches!(
            result,
            Err(ValidationError::ColumnLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_observed_skips_missing() {
        let table = DataTable::new()
            .with_optional_column("a", vec![Some(1.0), None, Some(3.0)])
            .unwrap();

        assert_eq!(table.column("a").unwrap().observed(), vec![1.0, 3.0]);
    }
}
