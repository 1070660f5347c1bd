use thiserror::Error;

/// User-facing failure modes of the exploration pipeline.
///
/// Every variant is recoverable at the boundary: the host surfaces the
/// message, skips rendering for that interaction, and waits for corrected
/// input. None of these abort the session.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The upload's extension is neither `.csv` nor `.xlsx`.
    #[error("unsupported file format '{extension}': expected .csv or .xlsx")]
    UnsupportedFormat { extension: String },

    /// The upload matched a supported format but its content was malformed.
    #[error("failed to parse uploaded file")]
    Parse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No file has been uploaded yet; the host shows an upload prompt.
    #[error("no file uploaded")]
    NoInput,

    /// The upload parsed but contains no data rows.
    #[error("the uploaded file is empty")]
    EmptyTable,

    /// The upload parsed but contains no columns.
    #[error("the uploaded file contains no columns")]
    NoColumns,

    /// The column selection is empty, so there is nothing to summarize.
    #[error("no columns selected: nothing to display")]
    NoDataAfterFilter,
}

impl PipelineError {
    pub(crate) fn parse<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PipelineError::Parse {
            source: Box::new(source),
        }
    }
}
