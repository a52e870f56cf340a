//! Complaint endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::{complaint, Complaint, ComplaintStatus, DatabaseError, NewComplaint};
use intake_core::ComplaintPayload;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, Result};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Body of `POST /complaints`.
#[derive(Debug, Deserialize)]
pub struct CreateComplaint {
    #[serde(default)]
    pub title: Option<String>,
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
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Query string of `GET /complaints`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of `PATCH /complaints/:reference/status`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// A complaint as returned by the API, with metadata parsed.
#[derive(Debug, Serialize)]
pub struct ComplaintView {
    pub id: i64,
    pub reference_number: String,
    pub title: String,
    pub description: String,
    pub transcript: Option<String>,
    pub language: Option<String>,
    pub translated_text: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub department_code: String,
    pub source: String,
    pub status: String,
    pub metadata: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<Complaint> for ComplaintView {
    type Error = DatabaseError;

    fn try_from(complaint: Complaint) -> std::result::Result<Self, Self::Error> {
        let metadata = complaint.metadata_json()?;
        Ok(Self {
            id: complaint.id,
            reference_number: complaint.reference_number,
            title: complaint.title,
            description: complaint.description,
            transcript: complaint.transcript,
            language: complaint.language,
            translated_text: complaint.translated_text,
            category: complaint.category,
            subcategory: complaint.subcategory,
            department_code: complaint.department_code,
            source: complaint.source,
            status: complaint.status,
            metadata,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        })
    }
}

/// File a complaint without going through chat.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateComplaint>,
) -> Result<(StatusCode, Json<ComplaintView>)> {
    let description = body.description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest("description is required".to_string()));
    }

    let title = body
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ComplaintPayload::title_from(description));

    let new = NewComplaint {
        title,
        description: description.to_string(),
        transcript: body.transcript,
        language: body.language,
        translated_text: body.translated_text,
        category: body.category,
        subcategory: body.subcategory,
        department_code: body.department_code.trim().to_string(),
        source: body.source.unwrap_or_else(|| "web".to_string()),
        metadata: body.metadata,
    };

    let created = match complaint::create_complaint(state.db.pool(), &new).await {
        Err(DatabaseError::NotFound { entity: "Department", id }) => {
            return Err(ApiError::BadRequest(format!("Unknown department: {}", id)));
        }
        other => other?,
    };

    info!(
        reference = %created.reference_number,
        department = %created.department_code,
        "Complaint created"
    );

    Ok((StatusCode::CREATED, Json(created.try_into()?)))
}

/// List complaints, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ComplaintView>>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ComplaintStatus>()?),
    };
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let complaints = complaint::list_complaints(state.db.pool(), status, limit, offset).await?;
    let views = complaints
        .into_iter()
        .map(ComplaintView::try_from)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Json(views))
}

/// Look up one complaint by reference number.
pub async fn get(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<ComplaintView>> {
    let found = complaint::get_complaint_by_reference(state.db.pool(), &reference).await?;
    Ok(Json(found.try_into()?))
}

/// Move a complaint to a new status.
pub async fn update_status(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<ComplaintView>> {
    let status: ComplaintStatus = body.status.parse()?;
    let updated = complaint::update_complaint_status(state.db.pool(), &reference, status).await?;

    info!(reference = %reference, status = %status, "Complaint status updated");
    Ok(Json(updated.try_into()?))
}
