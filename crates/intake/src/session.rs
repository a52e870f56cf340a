//! Conversation session state.

use intake_core::{Category, Intent};
use serde::{Deserialize, Serialize};

/// Sentinel stored as the backend reference when complaint creation failed.
pub const ERROR_REFERENCE: &str = "ERROR";

/// Field the next message is expected to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwaitingField {
    Phone,
    Location,
    DepartmentCode,
    Confirmation,
}

impl AwaitingField {
    /// Collection order for missing fields.
    pub const COLLECTION_ORDER: [AwaitingField; 3] = [
        AwaitingField::Phone,
        AwaitingField::Location,
        AwaitingField::DepartmentCode,
    ];

    /// Name reported in `missing_fields`.
    pub fn key(&self) -> &'static str {
        match self {
            AwaitingField::Phone => "user.phone",
            AwaitingField::Location => "location",
            AwaitingField::DepartmentCode => "department_code",
            AwaitingField::Confirmation => "confirmation",
        }
    }
}

/// Where a conversation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// No complaint description captured yet.
    Fresh,
    /// Waiting for the given field.
    Collecting(AwaitingField),
    /// All fields present; waiting for the citizen to confirm or correct.
    Confirming,
    /// Complaint created.
    Done,
}

/// One citizen's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: String,
    #[serde(default)]
    pub awaiting_field: Option<AwaitingField>,
    #[serde(default)]
    pub raw_text: Option<String>,
    /// Complaint text in the canonical language.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub department_code: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub backend_reference: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl ConversationSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Self::default()
        }
    }

    /// Whether a complaint was created for this conversation.
    pub fn is_filed(&self) -> bool {
        self.confirmed
            && self
                .backend_reference
                .as_deref()
                .is_some_and(|r| r != ERROR_REFERENCE)
    }

    /// Required fields that are still empty, in collection order.
    pub fn missing_fields(&self) -> Vec<AwaitingField> {
        AwaitingField::COLLECTION_ORDER
            .into_iter()
            .filter(|field| match field {
                AwaitingField::Phone => is_blank(&self.phone),
                AwaitingField::Location => is_blank(&self.location),
                AwaitingField::DepartmentCode => is_blank(&self.department_code),
                AwaitingField::Confirmation => false,
            })
            .collect()
    }

    /// Derive the conversation state from the stored fields.
    pub fn state(&self) -> ChatState {
        if self.is_filed() {
            return ChatState::Done;
        }
        if self.description.is_none() {
            return ChatState::Fresh;
        }
        match self.awaiting_field {
            Some(AwaitingField::Confirmation) => ChatState::Confirming,
            Some(field) => ChatState::Collecting(field),
            None => match self.missing_fields().first() {
                Some(field) => ChatState::Collecting(*field),
                None => ChatState::Confirming,
            },
        }
    }

    /// Forget the filed complaint but keep who the citizen is.
    pub fn reset_for_new_complaint(&mut self) {
        let session_id = std::mem::take(&mut self.session_id);
        let phone = self.phone.take();
        *self = Self {
            session_id,
            phone,
            ..Self::default()
        };
    }

    /// Snapshot returned to chat clients.
    pub fn context(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}
