//! Core types and collaborator traits for grievance intake.
//!
//! This crate provides the shared interface between the chat intake core
//! and the services it talks to. It defines:
//!
//! - [`ClassificationResult`] with the closed [`Category`] and [`Intent`] sets
//! - [`ComplaintPayload`] / [`ComplaintReceipt`] - creation payload and result
//! - [`ServiceError`] - errors raised by external collaborators
//! - [`Classifier`], [`Translator`], [`LanguageDetector`],
//!   [`DepartmentDirectory`] and [`ComplaintSink`] - collaborator traits
//! - [`with_retry`] - bounded retry with per-attempt timeout and backoff
//!
//! # Example
//!
//! ```rust
//! use intake_core::{async_trait, Classifier, ClassificationResult, ServiceError};
//!
//! struct AlwaysOther;
//!
//! #[async_trait]
//! impl Classifier for AlwaysOther {
//!     async fn classify(&self, _text: &str) -> Result<ClassificationResult, ServiceError> {
//!         Ok(ClassificationResult::default())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "AlwaysOther"
//!     }
//! }
//! ```

mod classification;
mod complaint;
mod error;
mod json;
mod prompt;
mod retry;
mod traits;

pub use classification::{Category, ClassificationResult, Intent, DEFAULT_SUBCATEGORY, UNKNOWN};
pub use complaint::{
    ComplaintMetadata, ComplaintPayload, ComplaintReceipt, Department,
    COMPLAINT_SOURCE_CHATBOT, MAX_TITLE_CHARS,
};
pub use error::ServiceError;
pub use json::{extract_balanced_json, extract_json};
pub use prompt::hash_prompt;
pub use retry::{with_retry, RetryPolicy};
pub use traits::{Classifier, ComplaintSink, DepartmentDirectory, LanguageDetector, Translator};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
