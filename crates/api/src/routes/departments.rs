//! Department endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::{department, DatabaseError, Department, NewDepartment};

use crate::error::{ApiError, Result};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Department>>> {
    Ok(Json(department::list_departments(state.db.pool()).await?))
}

/// Add a department. The parent, when given, must already exist.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<NewDepartment>,
) -> Result<(StatusCode, Json<Department>)> {
    let new = NewDepartment {
        code: body.code.trim().to_uppercase(),
        name: body.name.trim().to_string(),
        parent_code: body
            .parent_code
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty()),
    };
    if new.code.is_empty() || new.name.is_empty() {
        return Err(ApiError::BadRequest(
            "code and name are required".to_string(),
        ));
    }

    let created = match department::create_department(state.db.pool(), &new).await {
        Err(DatabaseError::NotFound { id, .. }) => {
            return Err(ApiError::BadRequest(format!("Unknown parent department: {}", id)));
        }
        other => other?,
    };

    Ok((StatusCode::CREATED, Json(created)))
}
