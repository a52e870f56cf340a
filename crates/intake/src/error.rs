//! Error types for intake operations.

use database::DatabaseError;
use intake_core::ServiceError;
use thiserror::Error;

/// Errors that can occur outside the chat reply path.
///
/// The chat flow itself never fails; these surface from session stores and
/// from direct use of collaborators.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Persisted session storage failed.
    #[error("session store error: {0}")]
    Store(#[from] DatabaseError),

    /// A collaborator call failed.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),

    /// Session state could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
