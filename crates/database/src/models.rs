//! Database models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::DatabaseError;

/// A government department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Department {
    /// Short code (e.g., "BBMP", "PW-SUB")
    pub code: String,
    /// Display name
    pub name: String,
    /// Parent department code for sub-departments
    pub parent_code: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

/// Input for creating a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub parent_code: Option<String>,
}

/// Complaint lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    New,
    Triaged,
    InProgress,
    Resolved,
    Escalated,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 6] = [
        ComplaintStatus::New,
        ComplaintStatus::Triaged,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Escalated,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::New => "new",
            ComplaintStatus::Triaged => "triaged",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Escalated => "escalated",
            ComplaintStatus::Closed => "closed",
        }
    }

    /// Closed complaints are final; every other move is allowed.
    pub fn can_transition_to(&self, next: ComplaintStatus) -> bool {
        *self != ComplaintStatus::Closed || next == ComplaintStatus::Closed
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        ComplaintStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| DatabaseError::InvalidStatus(s.to_string()))
    }
}

/// A stored complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Complaint {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Tracking number (e.g., "COMP-123456")
    pub reference_number: String,
    pub title: String,
    pub description: String,
    pub transcript: Option<String>,
    /// Detected language code
    pub language: Option<String>,
    pub translated_text: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub department_code: String,
    /// Where the complaint came from (e.g., "chatbot", "web")
    pub source: String,
    /// Lifecycle status, stored as text
    pub status: String,
    /// JSON object with free-form details
    pub metadata: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Complaint {
    /// Parsed lifecycle status.
    pub fn status(&self) -> Result<ComplaintStatus, DatabaseError> {
        self.status.parse()
    }

    /// Parsed metadata object.
    pub fn metadata_json(&self) -> Result<serde_json::Value, DatabaseError> {
        Ok(serde_json::from_str(&self.metadata)?)
    }
}

/// Input for creating a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub translated_text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub department_code: String,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

fn default_source() -> String {
    "web".to_string()
}

/// A persisted chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionRecord {
    pub session_id: String,
    /// Serialized session state (JSON).
    pub state: String,
    /// Incremented on every write.
    pub version: i64,
    pub updated_at: String,
}

/// Complaint totals for dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintStats {
    pub total: i64,
    pub by_status: Vec<(String, i64)>,
    pub by_department: Vec<(String, i64)>,
}
