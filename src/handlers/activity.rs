use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::bearer_token;
use crate::errors::AppError;
use crate::models::{Booking, Role};
use crate::services::activity::{ActivityFilter, DateWindow, StatusFilter};
use crate::services::cache;
use crate::state::AppState;

// GET /api/activity
#[derive(Deserialize)]
pub struct ActivityQuery {
    pub tab: Option<String>,
    pub q: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub refresh: Option<bool>,
}

#[derive(Serialize)]
pub struct ActivityResponse {
    tab: &'static str,
    total: usize,
    items: Vec<Booking>,
}

fn parse_tab(tab: Option<&str>) -> Result<Role, AppError> {
    match tab.unwrap_or("service-taken") {
        "service-taken" => Ok(Role::Customer),
        "service-provided" => Ok(Role::Provider),
        other => Err(AppError::BadRequest(format!("unknown tab: {other}"))),
    }
}

fn tab_name(role: Role) -> &'static str {
    match role {
        Role::Customer => "service-taken",
        Role::Provider => "service-provided",
    }
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<ActivityResponse>, AppError> {
    let token = bearer_token(&headers)?;
    let role = parse_tab(query.tab.as_deref())?;

    let filter = ActivityFilter {
        text: query.q,
        status: query
            .status
            .as_deref()
            .map(str::parse::<StatusFilter>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .unwrap_or_default(),
        window: query
            .date
            .as_deref()
            .map(str::parse::<DateWindow>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .unwrap_or_default(),
    };

    let bookings = cache::bookings_for(&state, &token, role, query.refresh.unwrap_or(false)).await?;
    let items = filter.apply(&bookings, state.clock.now());

    Ok(Json(ActivityResponse {
        tab: tab_name(role),
        total: bookings.len(),
        items,
    }))
}
