//! Route handlers.

pub mod analytics;
pub mod chat;
pub mod complaints;
pub mod departments;
pub mod health;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route(
            "/complaints",
            post(complaints::create).get(complaints::list),
        )
        .route("/complaints/:reference", get(complaints::get))
        .route(
            "/complaints/:reference/status",
            patch(complaints::update_status),
        )
        .route(
            "/departments",
            get(departments::list).post(departments::create),
        )
        .route("/analytics", get(analytics::analytics))
}
