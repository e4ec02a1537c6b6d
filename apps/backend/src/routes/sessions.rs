//! Study session history endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use review_core::compute_accuracy;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

const DEFAULT_SESSION_LIMIT: i64 = 100;
const MAX_SESSION_LIMIT: i64 = 1000;

/// Session counts are stored as INT
fn stored_count(value: u32, field: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| ApiError::BadRequest(format!("{} is too large: {}", field, value)))
}

/// POST /api/sessions
pub async fn save(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SaveSessionRequest>,
) -> Result<Json<SessionRecord>> {
    let total_answered = stored_count(payload.total_answered, "total_answered")?;
    let correct = stored_count(payload.correct, "correct")?;
    if correct > total_answered {
        return Err(ApiError::BadRequest(format!(
            "correct ({}) cannot exceed total_answered ({})",
            payload.correct, payload.total_answered
        )));
    }

    let finished_at = Utc::now();
    let started_at = payload.started_at.unwrap_or(finished_at);
    if started_at > finished_at {
        return Err(ApiError::BadRequest(
            "started_at cannot be in the future".to_string(),
        ));
    }

    let session = NewSession {
        user_id: auth.user_id,
        deck_id: payload.deck_id,
        mode: payload.mode,
        total_answered,
        correct,
        accuracy: compute_accuracy(payload.total_answered, payload.correct),
        started_at,
        finished_at,
    };

    let row = state.db.insert_session(&session).await?;
    tracing::info!(
        user_id = %auth.user_id,
        deck_id = row.deck_id,
        mode = %row.mode,
        accuracy = row.accuracy,
        "Saved study session"
    );

    Ok(Json(row.to_api_session()))
}

/// GET /api/sessions
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<SessionListResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_SESSION_LIMIT)
        .clamp(1, MAX_SESSION_LIMIT);

    let sessions = state
        .db
        .list_sessions(auth.user_id, query.deck_id, limit)
        .await?;

    Ok(Json(SessionListResponse {
        sessions: sessions.iter().map(|s| s.to_api_session()).collect(),
    }))
}
