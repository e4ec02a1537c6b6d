//! Study endpoints

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use review_core::{card_weight, choose_weighted_index, grade_answer, shuffle_cards};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/study/queue?deck_id=
/// Normal mode: every card of the deck once, in random order
pub async fn queue(
    State(state): State<AppState>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<StudyQueueResponse>> {
    let deck = state
        .db
        .get_deck(query.deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let mut cards: Vec<Card> = state
        .db
        .list_cards(Some(deck.id))
        .await?
        .iter()
        .map(|c| c.to_api_card())
        .collect();

    shuffle_cards(&mut cards, &mut rand::thread_rng());

    Ok(Json(StudyQueueResponse {
        deck: deck.to_api_deck(Utc::now()),
        cards,
    }))
}

/// GET /api/study/next?deck_id=
/// Endless mode: one card drawn by weight from the caller's progress
pub async fn next(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<DeckQuery>,
) -> Result<Json<NextCardResponse>> {
    state
        .db
        .get_deck(query.deck_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let cards: Vec<Card> = state
        .db
        .list_cards(Some(query.deck_id))
        .await?
        .iter()
        .map(|c| c.to_api_card())
        .collect();

    if cards.is_empty() {
        return Err(ApiError::BadRequest("Deck has no cards".to_string()));
    }

    let progress = state
        .db
        .get_progress_for_deck(auth.user_id, query.deck_id)
        .await?;
    let stats = stats_by_card(&progress);

    let index = choose_weighted_index(&cards, &stats, &mut rand::thread_rng());
    let card = cards.into_iter().nth(index).ok_or_else(|| {
        ApiError::Internal(format!("Weighted draw returned out-of-range index {}", index))
    })?;

    Ok(Json(NextCardResponse {
        weight: card_weight(card.id, &stats),
        stats: stats.get(&card.id).copied(),
        card,
    }))
}

/// POST /api/study/answer
/// Grades a typed answer and records the outcome
pub async fn answer(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>> {
    let card = state
        .db
        .get_card(payload.card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    let grade = grade_answer(&payload.answer, &card.answer);
    let outcome = Outcome::from_correct(grade.is_correct);

    let progress = state
        .db
        .record_outcome(auth.user_id, card.id, outcome)
        .await?;

    tracing::debug!(
        card_id = card.id,
        distance = grade.distance,
        allowed = grade.allowed_edits,
        outcome = outcome.as_str(),
        "Graded answer"
    );

    Ok(Json(SubmitAnswerResponse {
        card_id: card.id,
        outcome,
        grade,
        expected_answer: card.answer,
        explanation: card.explanation,
        stats: progress.to_core_stats(),
    }))
}
