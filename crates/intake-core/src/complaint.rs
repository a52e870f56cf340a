//! Complaint creation payloads and department references.

use serde::{Deserialize, Serialize};

use crate::classification::Intent;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 60;

/// Source tag for complaints filed through the chat flow.
pub const COMPLAINT_SOURCE_CHATBOT: &str = "chatbot";

/// A government department that can own complaints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Short code (e.g. "BBMP", "PW-SUB").
    pub code: String,
    /// Display name (e.g. "Public Works - Roads").
    pub name: String,
}

impl Department {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Free-form details attached to a chat complaint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplaintMetadata {
    pub location: Option<String>,
    pub phone: Option<String>,
    pub intent: Option<Intent>,
}

/// Payload handed to a [`ComplaintSink`](crate::ComplaintSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintPayload {
    pub title: String,
    pub description: String,
    pub transcript: Option<String>,
    pub language: Option<String>,
    pub translated_text: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub department_code: String,
    pub source: String,
    pub metadata: ComplaintMetadata,
}

impl ComplaintPayload {
    /// Build a title from a description, truncated to [`MAX_TITLE_CHARS`].
    pub fn title_from(description: &str) -> String {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return "Chatbot Complaint".to_string();
        }
        trimmed.chars().take(MAX_TITLE_CHARS).collect()
    }
}

/// What a sink returns after creating a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintReceipt {
    pub id: String,
    /// Human-readable tracking number (e.g. "COMP-123456").
    pub reference_number: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_truncated_by_chars() {
        let description = "ಕಸ ".repeat(40);
        let title = ComplaintPayload::title_from(&description);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
    }

    #[test]
    fn test_title_short_description_kept() {
        assert_eq!(ComplaintPayload::title_from("  Broken lamp "), "Broken lamp");
    }

    #[test]
    fn test_title_blank_description() {
        assert_eq!(ComplaintPayload::title_from("   "), "Chatbot Complaint");
    }
}
