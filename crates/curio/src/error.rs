//! Library error types.

use thiserror::Error;

/// Errors raised while parsing Curio's typed vocabularies and inputs.
///
/// Query execution never produces these: repository and transformer
/// failures pass through as the collaborator's own error.
#[derive(Debug, Error)]
pub enum CurioError {
    #[error("invalid sort direction '{0}' (expected 'asc' or 'desc')")]
    InvalidSortDirection(String),

    #[error(
        "invalid change frequency '{0}' (expected always, hourly, daily, weekly, monthly, yearly or never)"
    )]
    InvalidChangeFrequency(String),

    #[error("invalid collection data: {0}")]
    InvalidCollectionData(String),
}

/// Result type alias using CurioError.
pub type CurioResult<T> = Result<T, CurioError>;
