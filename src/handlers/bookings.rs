use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::bearer_token;
use crate::errors::AppError;
use crate::models::{Actor, Booking, BookingStatus, Role, TransitionPayload};
use crate::services::cache;
use crate::services::executor::TransitionExecutor;
use crate::services::transitions::{self, AvailableAction};
use crate::state::AppState;

// GET /api/bookings/:id/actions
#[derive(Deserialize)]
pub struct ActionsQuery {
    pub role: Role,
}

#[derive(Serialize)]
pub struct ActionsResponse {
    booking_id: i64,
    status: BookingStatus,
    actions: Vec<AvailableAction>,
}

pub async fn get_actions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<ActionsQuery>,
) -> Result<Json<ActionsResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let booking = state.api.fetch_booking(&token, id).await?;

    Ok(Json(ActionsResponse {
        booking_id: booking.id,
        status: booking.status,
        actions: transitions::available_actions(&booking, query.role),
    }))
}

// POST /api/bookings/:id/transition
#[derive(Deserialize)]
pub struct TransitionRequest {
    pub status: String,
    pub actor: Actor,
    #[serde(flatten)]
    pub payload: TransitionPayload,
}

pub async fn transition(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<TransitionRequest>,
) -> Result<Json<Booking>, AppError> {
    let token = bearer_token(&headers)?;
    let requested = body
        .status
        .parse::<BookingStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Validate against the server's current copy, never a cached one.
    let current = state.api.fetch_booking(&token, id).await?;

    let executor = TransitionExecutor::new(state.api.as_ref(), &token);
    let updated = executor
        .execute(&current, requested, &body.actor, &body.payload)
        .await?;

    cache::record_update(&state, &token, &updated);
    Ok(Json(updated))
}
