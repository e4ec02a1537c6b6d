//! Card endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// Trim an optional text field, dropping it when blank
fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require_text(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// GET /api/cards
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CardListQuery>,
) -> Result<Json<CardListResponse>> {
    let cards = state.db.list_cards(query.deck_id).await?;
    Ok(Json(CardListResponse {
        cards: cards.iter().map(|c| c.to_api_card()).collect(),
    }))
}

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<Json<Card>> {
    let request = CreateCardRequest {
        deck_id: payload.deck_id,
        question: require_text(&payload.question, "Question")?,
        answer: require_text(&payload.answer, "Answer")?,
        explanation: clean_optional(payload.explanation),
        image_path: clean_optional(payload.image_path),
        explanation_image_path: clean_optional(payload.explanation_image_path),
    };

    let card = state.db.create_card(&request).await?;
    tracing::debug!("Created card {} in deck {}", card.id, card.deck_id);

    Ok(Json(card.to_api_card()))
}

/// PUT /api/cards/:id
pub async fn update(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
    Json(payload): Json<UpdateCardRequest>,
) -> Result<Json<Card>> {
    let update = UpdateCardRequest {
        question: require_text(&payload.question, "Question")?,
        answer: require_text(&payload.answer, "Answer")?,
        explanation: clean_optional(payload.explanation),
    };

    let card = state
        .db
        .update_card(card_id, &update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card.to_api_card()))
}

/// DELETE /api/cards/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(card_id): Path<i64>,
) -> Result<Json<Value>> {
    if !state.db.delete_card(card_id).await? {
        return Err(ApiError::NotFound("Card not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("  Paris ", "Answer").unwrap(), "Paris");
    }

    #[test]
    fn test_require_text_rejects_blank() {
        let err = require_text("   ", "Question").unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Question must not be empty");
    }

    #[test]
    fn test_clean_optional_drops_blank() {
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(Some(" img/a.png".to_string())), Some("img/a.png".to_string()));
        assert_eq!(clean_optional(None), None);
    }
}
