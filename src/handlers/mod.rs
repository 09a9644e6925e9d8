pub mod activity;
pub mod bookings;
pub mod reviews;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::errors::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/activity", get(activity::get_activity))
        .route("/api/bookings/:id/actions", get(bookings::get_actions))
        .route("/api/bookings/:id/transition", post(bookings::transition))
        .route(
            "/api/providers/:id/reviewable-bookings",
            get(reviews::get_reviewable_bookings),
        )
        .with_state(state)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

/// The caller's bearer token, forwarded as-is to the booking service.
fn bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or("");

    if token.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(token.to_string())
}
