//! Error types for the Assay library.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure an estimator, dataset or loader can report.
#[derive(Debug, Error)]
pub enum AssayError {
    /// Dataset schema or estimator configuration is unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Training preconditions unmet or the fit could not complete.
    #[error("Training error: {0}")]
    Training(String),

    /// A prediction was requested before a successful `train`.
    #[error("Estimator has not been trained")]
    NotTrained,

    /// Unknown attribute, malformed domain, or a batch row that was not supplied.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A data or config file could not be read.
    #[error("Cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Delimiter unusable for the given quoting rules.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// Input had no header or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssayError {
    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        AssayError::InvalidQuery(message.into())
    }
}

/// Result type alias for Assay operations.
pub type Result<T> = std::result::Result<T, AssayError>;
