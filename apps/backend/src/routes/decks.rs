//! Deck endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::review;
use crate::AppState;

/// GET /api/decks
pub async fn list(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let now = Utc::now();
    let decks = state.db.list_decks().await?;
    Ok(Json(DeckListResponse {
        decks: decks.iter().map(|d| d.to_api_deck(now)).collect(),
    }))
}

/// GET /api/decks/due
pub async fn due(State(state): State<AppState>) -> Result<Json<DeckListResponse>> {
    let now = Utc::now();
    let decks = state.db.list_due_decks(now).await?;
    Ok(Json(DeckListResponse {
        decks: decks.iter().map(|d| d.to_api_deck(now)).collect(),
    }))
}

/// POST /api/decks
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateDeckRequest>,
) -> Result<Json<DeckInfo>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Deck name must not be empty".to_string()));
    }

    let deck = state.db.create_deck(name).await?;
    tracing::info!("Created deck {} ({})", deck.id, deck.name);

    Ok(Json(deck.to_api_deck(Utc::now())))
}

/// POST /api/decks/:id/review
/// Applies a finished run to the deck's review level and books its next review
pub async fn complete_review(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<CompleteRunRequest>,
) -> Result<Json<CompleteRunResponse>> {
    let (deck, scheduled) =
        review::complete_run(&state.db, &state.scheduler, deck_id, &payload).await?;

    Ok(Json(CompleteRunResponse::new(deck.id, scheduled)))
}
