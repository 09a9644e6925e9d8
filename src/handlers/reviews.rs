use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::bearer_token;
use crate::errors::AppError;
use crate::models::{Booking, Role};
use crate::services::{cache, reviews};
use crate::state::AppState;

// GET /api/providers/:id/reviewable-bookings
#[derive(Serialize)]
pub struct ReviewableResponse {
    provider_id: i64,
    has_completed_booking: bool,
    bookings: Vec<Booking>,
}

pub async fn get_reviewable_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(provider_id): Path<i64>,
) -> Result<Json<ReviewableResponse>, AppError> {
    let token = bearer_token(&headers)?;

    let bookings = cache::bookings_for(&state, &token, Role::Customer, true).await?;
    let existing = match state.api.provider_reviews(&token, provider_id).await {
        Ok(reviews) => reviews,
        Err(e) => {
            tracing::warn!(provider_id, error = %e, "could not load provider reviews");
            return Err(e.into());
        }
    };

    Ok(Json(ReviewableResponse {
        provider_id,
        has_completed_booking: reviews::has_completed_booking(&bookings, provider_id),
        bookings: reviews::reviewable_bookings(&bookings, provider_id, &existing),
    }))
}
