use std::path::PathBuf;

use thiserror::Error;

/// Error types for report generation
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reading or writing a report file failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A run log or trends file is not valid JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// None of the configured run logs exist
    #[error("No run log found (looked for: {0})")]
    NoRunLog(String),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ReportError::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
