//! Error types for the usage report.

use thiserror::Error;
use token_tracker::ProtocolError;

/// Report error types.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed usage line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: ProtocolError,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for report errors.
pub type ReportResult<T> = Result<T, ReportError>;
