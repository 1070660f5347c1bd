//! Session-scoped state and pipeline orchestration.
//!
//! A [`SessionContext`] holds everything an interactive session owns: the
//! current upload, the filter state rebuilt by the host UI, the cross-tab
//! column choice, and the visit counter. Each interaction calls
//! [`SessionContext::refresh`], which reruns the whole pipeline
//! (validate → filter → summarize) from scratch; nothing is cached or
//! persisted beyond the session.

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::PipelineError,
    filter::FilterSpec,
    loader,
    summary::{self, ColumnReport, CrossTabRow, DistinctCount},
    table::Table,
    validate,
};

/// Column pair for the custom chart: one categorical X, one numeric Y.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTabChoice {
    pub category_column: String,
    pub numeric_column: String,
}

/// Cross-tab output alongside the columns that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    pub category_column: String,
    pub numeric_column: String,
    pub rows: Vec<CrossTabRow>,
}

/// Everything the Presentation Adapter needs to render one interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub table: Table,
    pub distinct_counts: Vec<DistinctCount>,
    pub summaries: Vec<ColumnReport>,
    pub cross_tab: Option<CrossTab>,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Default)]
pub struct SessionContext {
    table: Option<Table>,
    filter: FilterSpec,
    cross_tab: Option<CrossTabChoice>,
    visits: u64,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates an upload, replacing the current table and
    /// resetting the filter to the all-inclusive default. A rejected
    /// upload leaves the previous session state untouched.
    pub fn ingest_upload(&mut self, bytes: &[u8], filename: &str) -> Result<(), PipelineError> {
        let table = loader::load_upload(bytes, filename)?;
        validate::ensure_populated(&table)?;
        self.filter = FilterSpec::all_inclusive(&table);
        self.cross_tab = None;
        self.table = Some(table);
        Ok(())
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    pub fn set_cross_tab(&mut self, choice: Option<CrossTabChoice>) {
        self.cross_tab = choice;
    }

    pub fn record_visit(&mut self) -> u64 {
        self.visits += 1;
        self.visits
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Runs the full pipeline against the current session state.
    ///
    /// An invalid or stale cross-tab choice (column renamed away by a
    /// filter change, wrong kind) yields `cross_tab: None` rather than an
    /// error, mirroring a UI that only offers valid columns.
    pub fn refresh(&self) -> Result<Report, PipelineError> {
        let table = validate::require_upload(self.table.as_ref())?;
        validate::ensure_populated(table)?;

        let filtered = self.filter.apply(table)?;
        let distinct_counts = summary::distinct_counts(&filtered);
        let summaries = summary::summarize(&filtered);
        let cross_tab = self.cross_tab.as_ref().and_then(|choice| {
            summary::cross_tab(&filtered, &choice.category_column, &choice.numeric_column)
                .ok()
                .map(|rows| CrossTab {
                    category_column: choice.category_column.clone(),
                    numeric_column: choice.numeric_column.clone(),
                    rows,
                })
        });

        info!(
            "Refreshed report: {} row(s), {} column(s), cross-tab {}",
            filtered.row_count(),
            filtered.column_count(),
            if cross_tab.is_some() { "present" } else { "absent" }
        );
        Ok(Report {
            table: filtered,
            distinct_counts,
            summaries,
            cross_tab,
        })
    }
}
