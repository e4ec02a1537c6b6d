//! Per-card progress endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/progress/cards?deck_id=
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<ProgressListResponse>> {
    let rows = state
        .db
        .get_progress_for_deck(auth.user_id, query.deck_id)
        .await?;

    Ok(Json(ProgressListResponse {
        progress: rows.iter().map(|r| r.to_api_progress()).collect(),
    }))
}

/// POST /api/progress/event
/// Records a self-graded outcome without typed-answer matching
pub async fn record(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<ProgressEventRequest>,
) -> Result<Json<CardProgress>> {
    state
        .db
        .get_card(payload.card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    let row = state
        .db
        .record_outcome(auth.user_id, payload.card_id, payload.outcome)
        .await?;

    Ok(Json(row.to_api_progress()))
}
