//! Chat request and response types.

use serde::{Deserialize, Serialize};

use crate::session::{AwaitingField, ConversationSession};

/// Details the client already knows about the citizen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserFields {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// One chat turn from the citizen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub user_input: String,
    #[serde(default)]
    pub user: Option<UserFields>,
}

impl ChatRequest {
    pub fn new(session_id: impl Into<String>, user_input: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_input: user_input.into(),
            user: None,
        }
    }

    pub fn with_user(mut self, user: UserFields) -> Self {
        self.user = Some(user);
        self
    }
}

/// The chatbot's reply.
///
/// `is_ready` is true only on the turn that created a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    pub is_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_reference: Option<String>,
    pub context: serde_json::Value,
}

impl ChatResponse {
    /// A plain reply that does not ask for any field.
    pub fn reply(message: impl Into<String>, session: &ConversationSession) -> Self {
        Self {
            message: message.into(),
            missing_fields: Vec::new(),
            is_ready: false,
            backend_reference: None,
            context: session.context(),
        }
    }

    /// A reply asking for fields; the first is the one being asked.
    pub fn asking(
        message: impl Into<String>,
        missing: &[AwaitingField],
        session: &ConversationSession,
    ) -> Self {
        Self {
            missing_fields: missing.iter().map(|f| f.key().to_string()).collect(),
            ..Self::reply(message, session)
        }
    }
}
