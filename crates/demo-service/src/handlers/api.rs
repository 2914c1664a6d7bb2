//! Mock API handlers.
//!
//! These endpoints exist to generate realistic traffic for metrics and
//! request tracing: a listing, a parameterized lookup, and a slow call.

use crate::errors::DemoError;
use crate::models::{SlowResponse, User, UsersResponse, MOCK_USERS};
use crate::routes::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Handler for GET /api/users
#[instrument(skip_all, name = "demo.api.list_users")]
pub async fn list_users() -> Json<UsersResponse> {
    Json(UsersResponse {
        users: &MOCK_USERS,
        count: MOCK_USERS.len(),
    })
}

/// Handler for GET /api/users/:id
///
/// Ids that are not a known user, including non-numeric ids, are 404.
#[instrument(skip_all, name = "demo.api.get_user", fields(user_id = %id))]
pub async fn get_user(Path(id): Path<String>) -> Result<Json<User>, DemoError> {
    id.parse::<u32>()
        .ok()
        .and_then(|user_id| MOCK_USERS.iter().find(|u| u.id == user_id))
        .copied()
        .map(Json)
        .ok_or_else(|| DemoError::NotFound("User not found".to_string()))
}

/// Handler for GET /api/slow
///
/// Sleeps for a random delay in the configured range before answering.
/// Useful for exercising latency buckets.
#[instrument(skip_all, name = "demo.api.slow")]
pub async fn slow(State(state): State<Arc<AppState>>) -> Json<SlowResponse> {
    let delay_ms = rand::thread_rng()
        .gen_range(state.config.slow_min_delay_ms..state.config.slow_max_delay_ms);

    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    tracing::debug!(target: "demo.api", delay_ms, "Slow request completed");

    Json(SlowResponse {
        message: "This was a slow request",
        delay_ms,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
