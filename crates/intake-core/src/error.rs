//! Error types for collaborator calls.

use thiserror::Error;

/// Errors that can occur when calling an external collaborator.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The collaborator is not configured (e.g. missing API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The collaborator is temporarily unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered, but the answer could not be used.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request could not be processed.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// A single attempt exceeded its time budget.
    #[error("request timed out")]
    Timeout,

    /// A looked-up record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl ServiceError {
    /// Whether retrying the same call could succeed.
    ///
    /// Model output varies between calls, so an unusable answer counts.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ServiceError::Network(_)
                | ServiceError::Unavailable(_)
                | ServiceError::Timeout
                | ServiceError::InvalidResponse(_)
        )
    }
}
