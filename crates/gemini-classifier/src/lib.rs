//! Google Gemini-backed complaint classification.
//!
//! This crate provides [`GeminiClassifier`], an implementation of
//! [`intake_core::Classifier`] that asks a Gemini model for a JSON
//! classification, and [`GeminiTranslator`], which uses the same client for
//! translation.
//!
//! # Features
//!
//! - Configured model first, then a list of fallback models
//! - Every model call wrapped in [`intake_core::with_retry`]
//! - Tolerant JSON extraction (plain, fenced, or embedded objects)
//! - Prompt template overridable by env var or file
//!
//! Errors are returned to the caller; falling back to keyword rules is the
//! intake core's job.
//!
//! ```rust,no_run
//! use gemini_classifier::{GeminiClassifier, GeminiConfig};
//! use intake_core::Classifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let classifier = GeminiClassifier::new(GeminiConfig::from_env()?)?;
//!     let result = classifier.classify("Garbage piling up near the market").await?;
//!     println!("{}", result.category);
//!     Ok(())
//! }
//! ```

mod api_types;
mod classifier;
mod client;
mod config;
mod prompt;
mod translator;

pub use classifier::GeminiClassifier;
pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder};
pub use prompt::{load_classifier_prompt, render_prompt, DEFAULT_CLASSIFIER_PROMPT, DEFAULT_PROMPT_FILE};
pub use translator::GeminiTranslator;
