//! Mock collaborator implementations for grievance intake tests.
//!
//! This crate provides in-memory implementations of the `intake-core` traits:
//! - `StaticClassifier` - Always returns the same classification
//! - `ScriptedClassifier` - Picks a classification by substring match
//! - `FailingClassifier` - Always fails with a configurable error
//! - `DelayedClassifier` - Wraps another classifier with artificial delay
//! - `MemoryComplaintSink` / `FailingComplaintSink` - Complaint creation
//! - `StaticDirectory` / `FailingDirectory` - Department lists
//! - `IdentityTranslator` / `FailingTranslator`, `FixedLanguageDetector`
//!
//! For production classification, use the `gemini-classifier` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_services::{Category, Classifier, ClassificationResult, Intent, StaticClassifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_services::ServiceError> {
//!     let classifier = StaticClassifier::new(ClassificationResult::for_category(
//!         Category::Roads,
//!         Intent::Complaint,
//!     ));
//!
//!     let result = classifier.classify("Pothole on 5th Main").await?;
//!     assert_eq!(result.category, Category::Roads);
//!     Ok(())
//! }
//! ```

mod classifier;
mod delayed;
mod directory;
mod sink;
mod translator;

// Re-export intake-core types for convenience
pub use intake_core::{
    async_trait, Category, ClassificationResult, Classifier, ComplaintPayload, ComplaintReceipt,
    ComplaintSink, Department, DepartmentDirectory, Intent, LanguageDetector, ServiceError,
    Translator,
};

pub use classifier::{FailingClassifier, FailureMode, ScriptedClassifier, StaticClassifier};
pub use delayed::DelayedClassifier;
pub use directory::{FailingDirectory, StaticDirectory};
pub use sink::{FailingComplaintSink, MemoryComplaintSink};
pub use translator::{FailingTranslator, FixedLanguageDetector, IdentityTranslator};
