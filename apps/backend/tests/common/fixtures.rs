//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};
use uuid::Uuid;

use flashcards_backend::models::CreateCardRequest;

/// Deck names are unique across the shared test database.
pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, Uuid::new_v4().simple())
}

/// Numbered card with a predictable answer.
pub fn card_request(deck_id: i64, n: usize) -> CreateCardRequest {
    CreateCardRequest {
        deck_id,
        question: format!("Question {}?", n),
        answer: format!("Answer {}", n),
        explanation: Some(format!("Because of reason {}.", n)),
        image_path: None,
        explanation_image_path: None,
    }
}

/// Body for POST /api/decks/:id/review.
pub fn run_completion(correct: u32, total: u32, completed_at: Option<&str>) -> Value {
    match completed_at {
        Some(at) => json!({
            "correct_count": correct,
            "total_count": total,
            "completed_at": at,
        }),
        None => json!({ "correct_count": correct, "total_count": total }),
    }
}

/// Body for POST /api/sessions.
pub fn session_request(deck_id: i64, mode: &str, total: u32, correct: u32) -> Value {
    json!({
        "deck_id": deck_id,
        "mode": mode,
        "total_answered": total,
        "correct": correct,
    })
}
