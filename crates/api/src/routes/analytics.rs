//! Complaint analytics.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::Json;
use database::complaint;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Analytics {
    pub total: i64,
    pub by_status: BTreeMap<String, i64>,
    pub by_department: BTreeMap<String, i64>,
}

pub async fn analytics(State(state): State<AppState>) -> Result<Json<Analytics>> {
    let stats = complaint::complaint_stats(state.db.pool()).await?;

    Ok(Json(Analytics {
        total: stats.total,
        by_status: stats.by_status.into_iter().collect(),
        by_department: stats.by_department.into_iter().collect(),
    }))
}
