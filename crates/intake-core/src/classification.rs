//! Classification types shared by classifiers and the intake core.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ServiceError;

/// Default subcategory when none is known.
pub const DEFAULT_SUBCATEGORY: &str = "General";

/// Default place/department when none is known.
pub const UNKNOWN: &str = "Unknown";

/// Complaint category (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    Sanitation,
    #[serde(rename = "Water Supply")]
    WaterSupply,
    #[serde(rename = "Street Lighting")]
    StreetLighting,
    Roads,
    #[serde(rename = "Public Safety")]
    PublicSafety,
    #[default]
    Other,
}

impl Category {
    /// Every category, in keyword-matching priority order.
    pub const ALL: [Category; 6] = [
        Category::Sanitation,
        Category::WaterSupply,
        Category::StreetLighting,
        Category::Roads,
        Category::PublicSafety,
        Category::Other,
    ];

    /// Human-readable label, as used on the wire and in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sanitation => "Sanitation",
            Category::WaterSupply => "Water Supply",
            Category::StreetLighting => "Street Lighting",
            Category::Roads => "Roads",
            Category::PublicSafety => "Public Safety",
            Category::Other => "Other",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the citizen is trying to do (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Complaint,
    Request,
    Suggestion,
    Query,
    #[default]
    Other,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Complaint,
        Intent::Request,
        Intent::Suggestion,
        Intent::Query,
        Intent::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Complaint => "complaint",
            Intent::Request => "request",
            Intent::Suggestion => "suggestion",
            Intent::Query => "query",
            Intent::Other => "other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying complaint text.
///
/// Always schema-conformant: the category and intent come from their closed
/// sets and the free-text fields are never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub subcategory: String,
    pub place: String,
    pub department: String,
    pub intent: Intent,
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self {
            category: Category::Other,
            subcategory: DEFAULT_SUBCATEGORY.to_string(),
            place: UNKNOWN.to_string(),
            department: UNKNOWN.to_string(),
            intent: Intent::Other,
        }
    }
}

impl ClassificationResult {
    /// A result for a category found without model help.
    pub fn for_category(category: Category, intent: Intent) -> Self {
        Self {
            category,
            intent,
            ..Self::default()
        }
    }

    /// Validate and normalize a JSON object produced by a model.
    ///
    /// All of `category`, `subcategory`, `place`, `department` and `intent`
    /// must be present. An unknown category becomes `Other`/`General`, an
    /// unknown intent becomes `other`, and blank text fields fall back to
    /// `Unknown` (or `General` for the subcategory).
    pub fn from_model_output(value: &Value) -> Result<Self, ServiceError> {
        const REQUIRED: [&str; 5] = ["category", "subcategory", "place", "department", "intent"];

        let object = value
            .as_object()
            .ok_or_else(|| ServiceError::InvalidResponse("expected a JSON object".to_string()))?;

        if let Some(missing) = REQUIRED.iter().find(|key| !object.contains_key(**key)) {
            return Err(ServiceError::InvalidResponse(format!(
                "missing required key '{}', got: {:?}",
                missing,
                object.keys().collect::<Vec<_>>()
            )));
        }

        let text = |key: &str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let raw_category = text("category").unwrap_or_default();
        let (category, subcategory) = match Category::from_label(&raw_category) {
            Some(category) => (
                category,
                text("subcategory").unwrap_or_else(|| DEFAULT_SUBCATEGORY.to_string()),
            ),
            None => {
                warn!(category = %raw_category, "Invalid category, defaulting to Other");
                (Category::Other, DEFAULT_SUBCATEGORY.to_string())
            }
        };

        let raw_intent = text("intent").unwrap_or_default();
        let intent = Intent::from_label(&raw_intent).unwrap_or_else(|| {
            warn!(intent = %raw_intent, "Invalid intent, defaulting to other");
            Intent::Other
        });

        Ok(Self {
            category,
            subcategory,
            place: text("place").unwrap_or_else(|| UNKNOWN.to_string()),
            department: text("department").unwrap_or_else(|| UNKNOWN.to_string()),
            intent,
        })
    }
}
