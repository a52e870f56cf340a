//! Collaborator traits the intake core calls through.

use async_trait::async_trait;

use crate::classification::ClassificationResult;
use crate::complaint::{ComplaintPayload, ComplaintReceipt, Department};
use crate::error::ServiceError;

/// Classifies complaint text, typically by calling a hosted model.
///
/// Implementations may fail; callers are expected to fall back to local
/// rules rather than surface the error.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text.
    async fn classify(&self, text: &str) -> Result<ClassificationResult, ServiceError>;

    /// Name of this classifier, for logging.
    fn name(&self) -> &str;
}

/// Translates text into a target language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language` (ISO 639-1 code).
    ///
    /// An empty result means "no translation"; callers keep the original.
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ServiceError>;
}

/// Detects the language of a piece of text.
pub trait LanguageDetector: Send + Sync {
    /// Return an ISO 639-1 code for `text`.
    fn detect(&self, text: &str) -> Result<String, ServiceError>;
}

/// Read-only listing of known departments.
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    async fn list_departments(&self) -> Result<Vec<Department>, ServiceError>;
}

/// Persists complaints created by the intake flow.
#[async_trait]
pub trait ComplaintSink: Send + Sync {
    /// Create a complaint. All-or-nothing from the caller's perspective.
    async fn create(&self, payload: ComplaintPayload) -> Result<ComplaintReceipt, ServiceError>;

    /// Look up a complaint by its reference number.
    async fn find_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<Option<ComplaintReceipt>, ServiceError>;
}
