//! Per-column summaries: distinct counts, categorical frequency tables,
//! numeric histograms, and categorical-by-numeric cross-tabulation.
//!
//! Everything here is a pure function of the input table; summaries are
//! recomputed on demand after each filter change, never cached.

use std::collections::HashMap;

use anyhow::{Result, anyhow, bail};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    data::ColumnKind,
    table::{Column, Table},
};

/// Upper bound on histogram buckets so wide uploads stay chartable.
const MAX_HISTOGRAM_BUCKETS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistinctCount {
    pub column: String,
    pub distinct: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Equal-width bucket counts over a numeric column. `edges` has one more
/// entry than `counts`; the final bucket is closed on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnSummary {
    Categorical { counts: Vec<CategoryCount> },
    Numeric { histogram: Histogram },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub summary: ColumnSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTabRow {
    pub category: String,
    pub total: f64,
}

/// Count of distinct non-missing values per column, in column order.
pub fn distinct_counts(table: &Table) -> Vec<DistinctCount> {
    table
        .columns()
        .iter()
        .map(|column| DistinctCount {
            column: column.name.clone(),
            distinct: column.distinct_count(),
        })
        .collect()
}

/// Summarizes every column: frequency tables for categorical and date
/// columns, histograms for numeric ones.
pub fn summarize(table: &Table) -> Vec<ColumnReport> {
    table
        .columns()
        .iter()
        .map(|column| {
            let summary = match column.kind {
                ColumnKind::Categorical | ColumnKind::Date => ColumnSummary::Categorical {
                    counts: frequency_table(column),
                },
                ColumnKind::Numeric => ColumnSummary::Numeric {
                    histogram: histogram(column),
                },
            };
            ColumnReport {
                column: column.name.clone(),
                summary,
            }
        })
        .collect()
}

/// Occurrence counts ordered by descending count; ties broken by first
/// appearance in the source data. Missing cells are not counted.
pub fn frequency_table(column: &Column) -> Vec<CategoryCount> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in column.values.iter().flatten() {
        let display = value.as_display();
        let next = order.len();
        order.entry(display.clone()).or_insert(next);
        *counts.entry(display).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| order[&a.0].cmp(&order[&b.0])))
        .map(|(value, count)| CategoryCount { value, count })
        .collect()
}

/// Buckets the column's non-missing values into an automatically sized
/// histogram using the square-root rule, clamped to [1, 50] buckets.
/// Columns without variance collapse into a single bucket.
pub fn histogram(column: &Column) -> Histogram {
    let values: Vec<f64> = column
        .values
        .iter()
        .flatten()
        .filter_map(|value| value.as_f64())
        .collect();
    if values.is_empty() {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Histogram {
            edges: vec![min, max],
            counts: vec![values.len()],
        };
    }

    let buckets = ((values.len() as f64).sqrt().round() as usize).clamp(1, MAX_HISTOGRAM_BUCKETS);
    let width = (max - min) / buckets as f64;
    let mut edges: Vec<f64> = (0..=buckets).map(|i| min + width * i as f64).collect();
    edges[buckets] = max;

    let mut counts = vec![0usize; buckets];
    for value in values {
        let idx = (((value - min) / width) as usize).min(buckets - 1);
        counts[idx] += 1;
    }
    Histogram { edges, counts }
}

/// Groups rows by the categorical column and sums the numeric column per
/// group. Output order is the category's first appearance in the table.
/// Rows with a missing value in either column are skipped, so categories
/// with no summable rows are absent rather than zero.
pub fn cross_tab(
    table: &Table,
    category_column: &str,
    numeric_column: &str,
) -> Result<Vec<CrossTabRow>> {
    let category = table
        .column(category_column)
        .ok_or_else(|| anyhow!("Column '{category_column}' not found"))?;
    let numeric = table
        .column(numeric_column)
        .ok_or_else(|| anyhow!("Column '{numeric_column}' not found"))?;
    if category.kind.is_numeric() {
        bail!("Column '{category_column}' is numeric; expected a categorical column");
    }
    if !numeric.kind.is_numeric() {
        bail!("Column '{numeric_column}' is not numeric");
    }

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<CrossTabRow> = Vec::new();
    for (cat_cell, num_cell) in category.values.iter().zip(&numeric.values) {
        let (Some(cat), Some(num)) = (cat_cell, num_cell) else {
            continue;
        };
        let Some(amount) = num.as_f64() else {
            continue;
        };
        let label = cat.as_display();
        match index.get(&label) {
            Some(&pos) => rows[pos].total += amount,
            None => {
                index.insert(label.clone(), rows.len());
                rows.push(CrossTabRow {
                    category: label,
                    total: amount,
                });
            }
        }
    }
    Ok(rows)
}
