//! Conversational complaint intake.
//!
//! This crate provides the [`ChatOrchestrator`] which turns a sequence of chat
//! messages into a filed complaint, asking one question per turn.
//!
//! # Features
//!
//! - Rule-based intent detection with canned replies for greetings, thanks,
//!   queries, suggestions and service requests
//! - Validation of descriptions, phone numbers and locations
//! - Classification that never fails: model, then keyword rules, then a
//!   fixed default, with a deterministic dead-animal rule
//! - Department mapping with directory-aware fallbacks
//! - Pluggable session stores (in-memory with TTL, or SQLite)
//! - Per-session serialization of turns
//!
//! # Flow
//!
//! ```text
//!  message ──▶ Fresh ──(greeting/thanks/query/...)──▶ canned reply
//!                │
//!                ▼ description captured, classified, mapped
//!            Collecting(phone → location → department_code)
//!                │
//!                ▼
//!            Confirming ◀──(correction: re-classify)──┐
//!                │ "yes"                              │
//!                ▼                                    │
//!              Done ──(next message: new complaint)───┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use database::Database;
//! use intake::{ChatOrchestrator, ChatRequest, DatabaseComplaintSink, TextClassifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:grievance.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let orchestrator = ChatOrchestrator::new(
//!         TextClassifier::keyword_only(),
//!         Arc::new(DatabaseComplaintSink::new(db)),
//!     );
//!
//!     let reply = orchestrator
//!         .handle(ChatRequest::new("session-1", "Garbage is piling up near the market"))
//!         .await;
//!     println!("{}", reply.message);
//!     Ok(())
//! }
//! ```

mod adapters;
mod classification;
mod department;
mod error;
mod intent;
mod language;
mod message;
mod orchestrator;
pub mod replies;
mod session;
mod store;
mod validation;

pub use adapters::{DatabaseComplaintSink, DatabaseDirectory};
pub use classification::{
    apply_domain_rules, classify_by_keywords, mentions_dead_animal, TextClassifier,
    DEAD_ANIMAL_SUBCATEGORY, KEYWORD_RULES,
};
pub use department::{map_department, static_department_code, DEFAULT_DEPARTMENT_CODE};
pub use error::IntakeError;
pub use intent::{detect_intent, IntentTag};
pub use language::{detect_or_unknown, ScriptLanguageDetector, UNKNOWN_LANGUAGE};
pub use message::{ChatRequest, ChatResponse, UserFields};
pub use orchestrator::{ChatOrchestrator, CANONICAL_LANGUAGE};
pub use session::{AwaitingField, ChatState, ConversationSession, ERROR_REFERENCE};
pub use store::{MemorySessionStore, SessionStore, SqliteSessionStore};
pub use validation::{
    clean_phone, validate_description, validate_location, validate_phone, DescriptionError,
    MIN_DESCRIPTION_CHARS, MIN_LOCATION_CHARS,
};
