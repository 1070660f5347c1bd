//! Upload validation: distinct, user-facing conditions surfaced before any
//! filtering or summarization runs.

use crate::{error::PipelineError, table::Table};

/// Requires that an upload exists. Absence is a prompt for the user, not a
/// malformed-input failure.
pub fn require_upload(table: Option<&Table>) -> Result<&Table, PipelineError> {
    table.ok_or(PipelineError::NoInput)
}

/// Rejects tables with no columns or no rows. A valid table has at least
/// one of each.
pub fn ensure_populated(table: &Table) -> Result<(), PipelineError> {
    if table.column_count() == 0 {
        return Err(PipelineError::NoColumns);
    }
    if table.row_count() == 0 {
        return Err(PipelineError::EmptyTable);
    }
    Ok(())
}
