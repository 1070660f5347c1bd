//! Declarative row/column filtering.
//!
//! A [`FilterSpec`] is rebuilt from the host UI's state on every interaction
//! and applied to the current table as a whole: column projection first,
//! then per-column categorical allow-lists and numeric ranges. Filters are
//! column-independent set intersections, so application order never changes
//! the result, and the source table is never mutated.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

use crate::{
    data::ColumnKind,
    error::PipelineError,
    table::{Column, Table},
};

/// Inclusive numeric bounds for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        ensure!(min <= max, "Range minimum {min} exceeds maximum {max}");
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The full filter state for one interaction.
///
/// Columns without an entry pass through unfiltered, and entries naming
/// values or columns absent from the table are simply ineffective.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub selected_columns: BTreeSet<String>,
    pub categorical: BTreeMap<String, BTreeSet<String>>,
    pub ranges: BTreeMap<String, NumericRange>,
}

impl FilterSpec {
    /// The host UI's default state: every column selected, every categorical
    /// value allowed, every numeric range at its observed full span.
    /// Applying this spec yields a table equal to the source.
    pub fn all_inclusive(table: &Table) -> Self {
        let mut spec = FilterSpec::default();
        for column in table.columns() {
            spec.selected_columns.insert(column.name.clone());
            match column.kind {
                ColumnKind::Categorical | ColumnKind::Date => {
                    let allowed: BTreeSet<String> = column
                        .values
                        .iter()
                        .flatten()
                        .map(|value| value.as_display())
                        .collect();
                    if !allowed.is_empty() {
                        spec.categorical.insert(column.name.clone(), allowed);
                    }
                }
                ColumnKind::Numeric => {
                    // Degenerate columns (min == max) get no range control.
                    if let Some((min, max)) = column.numeric_bounds()
                        && min < max
                    {
                        spec.ranges
                            .insert(column.name.clone(), NumericRange { min, max });
                    }
                }
            }
        }
        spec
    }

    /// Applies the spec, producing a derived table.
    ///
    /// An empty column selection is "no data" rather than an empty table:
    /// it fails with [`PipelineError::NoDataAfterFilter`] so callers
    /// suppress summarization. A selection that filters away every row
    /// still yields a valid zero-row table.
    pub fn apply(&self, table: &Table) -> Result<Table, PipelineError> {
        if self.selected_columns.is_empty() {
            return Err(PipelineError::NoDataAfterFilter);
        }
        let names: Vec<&String> = self.selected_columns.iter().collect();
        let projected = table.project(&names);

        let mut mask = vec![true; projected.row_count()];
        for column in projected.columns() {
            self.apply_column(column, &mut mask);
        }
        if mask.iter().all(|keep| *keep) {
            return Ok(projected);
        }
        Ok(projected.retain_rows(&mask))
    }

    // Each filter is a row-local predicate: a row's fate depends only on
    // its own cell, never on the rest of the column. Missing cells pass,
    // like columns without an entry do. This is what makes sequential
    // application commute and the all-inclusive spec a true round-trip.
    fn apply_column(&self, column: &Column, mask: &mut [bool]) {
        match column.kind {
            ColumnKind::Categorical | ColumnKind::Date => {
                let Some(allowed) = self.categorical.get(&column.name) else {
                    return;
                };
                if allowed.is_empty() {
                    return;
                }
                for (keep, value) in mask.iter_mut().zip(&column.values) {
                    *keep = *keep
                        && value
                            .as_ref()
                            .is_none_or(|v| allowed.contains(&v.as_display()));
                }
            }
            ColumnKind::Numeric => {
                let Some(range) = self.ranges.get(&column.name) else {
                    return;
                };
                for (keep, value) in mask.iter_mut().zip(&column.values) {
                    *keep = *keep
                        && value
                            .as_ref()
                            .and_then(|v| v.as_f64())
                            .is_none_or(|v| range.contains(v));
                }
            }
        }
    }
}
