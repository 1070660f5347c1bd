use std::collections::HashSet;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::data::{ColumnKind, Value, classify_column};

/// A named, homogeneous column of optional cell values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Option<Value>>,
}

impl Column {
    /// Builds a column and classifies its kind from the parsed cells.
    pub fn new(name: impl Into<String>, values: Vec<Option<Value>>) -> Self {
        let kind = classify_column(&values);
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Count of distinct non-missing values. Missing cells are excluded
    /// from the distinct count, not from existence.
    pub fn distinct_count(&self) -> usize {
        self.values
            .iter()
            .flatten()
            .map(|value| value.as_display())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Observed (min, max) over non-missing numeric cells. `None` for
    /// non-numeric columns or columns with no numeric values.
    pub fn numeric_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for value in self.values.iter().flatten() {
            let numeric = value.as_f64()?;
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(numeric), max.max(numeric)),
                None => (numeric, numeric),
            });
        }
        bounds
    }
}

/// An ordered sequence of named columns with a uniform row count.
///
/// Tables are created fresh per upload and never mutated: the filter engine
/// derives new tables, and summaries are recomputed on demand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                ensure!(
                    column.values.len() == expected,
                    "Column '{}' has {} row(s), expected {}",
                    column.name,
                    column.values.len(),
                    expected
                );
            }
        }
        let table = Self { columns };
        for (idx, column) in table.columns.iter().enumerate() {
            if table.columns[..idx].iter().any(|c| c.name == column.name) {
                bail!("Duplicate column name '{}'", column.name);
            }
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Derives a table containing only the named columns, preserving the
    /// source column order. Unknown names are ignored.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let columns = self
            .columns
            .iter()
            .filter(|column| names.iter().any(|n| n.as_ref() == column.name))
            .cloned()
            .collect();
        Table { columns }
    }

    /// Derives a table keeping only the rows where `mask` is true.
    /// The mask length must equal the row count.
    pub fn retain_rows(&self, mask: &[bool]) -> Table {
        debug_assert_eq!(mask.len(), self.row_count());
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let values = column
                    .values
                    .iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(value, _)| value.clone())
                    .collect();
                Column {
                    name: column.name.clone(),
                    kind: column.kind,
                    values,
                }
            })
            .collect();
        Table { columns }
    }
}
