//! Token usage protocol errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("No TOKEN_USAGE or TOKEN_SUMMARY marker in line")]
    MissingMarker,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Inconsistent total: {prompt} + {completion} != {total}")]
    InconsistentTotal {
        prompt: u64,
        completion: u64,
        total: u64,
    },
}
