//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from review-core
pub use review_core::types::{
    Card, CardId, CardStats, Deck, DeckId, Outcome, SessionRecord, StatsByCard, StudyMode,
};
pub use review_core::{AnswerGrade, ScheduledReview};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDeck {
    pub id: i64,
    pub name: String,
    pub review_level: i32,
    pub next_review_at: Option<DateTime<Utc>>,
}

impl DbDeck {
    /// Convert to review-core deck
    pub fn to_core_deck(&self) -> Deck {
        Deck {
            id: self.id,
            name: self.name.clone(),
            review_level: self.review_level,
            next_review_at: self.next_review_at,
        }
    }

    /// Convert to API deck with due flag relative to `now`
    pub fn to_api_deck(&self, now: DateTime<Utc>) -> DeckInfo {
        let deck = self.to_core_deck();
        DeckInfo {
            due: deck.is_due(now),
            next_review_label: review_core::describe_next_review(deck.next_review_at, now),
            id: deck.id,
            name: deck.name,
            review_level: deck.review_level,
            next_review_at: deck.next_review_at,
        }
    }
}

/// Card stored in PostgreSQL
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCard {
    pub id: i64,
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub explanation: Option<String>,
    pub image_path: Option<String>,
    pub explanation_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbCard {
    /// Convert to API card type
    pub fn to_api_card(&self) -> Card {
        Card {
            id: self.id,
            deck_id: self.deck_id,
            question: self.question.clone(),
            answer: self.answer.clone(),
            explanation: self.explanation.clone(),
            image_path: self.image_path.clone(),
            explanation_image_path: self.explanation_image_path.clone(),
        }
    }
}

/// Per-user progress row for one card
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardProgress {
    pub card_id: i64,
    pub seen: i32,
    pub correct: i32,
    pub last_outcome: Option<String>,
}

impl DbCardProgress {
    /// Convert to review-core stats
    pub fn to_core_stats(&self) -> CardStats {
        CardStats {
            seen: self.seen.max(0) as u32,
            correct: self.correct.max(0) as u32,
            last_outcome: self.last_outcome.as_deref().and_then(Outcome::from_str),
        }
    }

    /// Convert to API progress entry
    pub fn to_api_progress(&self) -> CardProgress {
        CardProgress {
            card_id: self.card_id,
            stats: self.to_core_stats(),
        }
    }
}

/// Build the stats lookup used by endless-mode selection
pub fn stats_by_card(rows: &[DbCardProgress]) -> StatsByCard {
    rows.iter()
        .map(|row| (row.card_id, row.to_core_stats()))
        .collect()
}

/// Session row joined with its deck name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSession {
    pub id: i64,
    pub deck_id: i64,
    pub deck_name: String,
    pub mode: String,
    pub total_answered: i32,
    pub correct: i32,
    pub accuracy: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DbSession {
    /// Convert to review-core session record
    pub fn to_api_session(&self) -> SessionRecord {
        SessionRecord {
            id: self.id,
            deck_id: self.deck_id,
            deck_name: self.deck_name.clone(),
            mode: StudyMode::from_str(&self.mode).unwrap_or_default(),
            total_answered: self.total_answered.max(0) as u32,
            correct: self.correct.max(0) as u32,
            accuracy: self.accuracy,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}

/// New session to insert
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: Uuid,
    pub deck_id: i64,
    pub mode: StudyMode,
    pub total_answered: i32,
    pub correct: i32,
    pub accuracy: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// === API Request/Response Types ===

/// User register request
#[derive(Debug, Deserialize)]
pub struct UserRegisterRequest {
    pub name: Option<String>,
}

/// User register response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserRegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

/// Current user response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatusResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

/// Deck as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckInfo {
    pub id: i64,
    pub name: String,
    pub review_level: i32,
    pub next_review_at: Option<DateTime<Utc>>,
    pub due: bool,
    pub next_review_label: String,
}

/// Deck list response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<DeckInfo>,
}

/// Create deck request
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDeckRequest {
    pub name: String,
}

/// Completed run submitted for scheduling
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteRunRequest {
    pub correct_count: u32,
    pub total_count: u32,
    #[serde(default)]
    pub completed_at: Option<String>,
}

/// Deck schedule after a completed run
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteRunResponse {
    pub deck_id: i64,
    pub review_level: i32,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
    pub score_percent: f64,
}

impl CompleteRunResponse {
    pub fn new(deck_id: i64, review: ScheduledReview) -> Self {
        Self {
            deck_id,
            review_level: review.review_level,
            interval_days: review.interval_days,
            next_review_at: review.next_review_at,
            score_percent: review.score_percent,
        }
    }
}

/// Card list query
#[derive(Debug, Deserialize)]
pub struct CardListQuery {
    pub deck_id: Option<i64>,
}

/// Create card request
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub deck_id: i64,
    pub question: String,
    pub answer: String,
    pub explanation: Option<String>,
    pub image_path: Option<String>,
    pub explanation_image_path: Option<String>,
}

/// Update card request
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCardRequest {
    pub question: String,
    pub answer: String,
    pub explanation: Option<String>,
}

/// Card list response
#[derive(Debug, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<Card>,
}

/// Query scoped to one deck
#[derive(Debug, Deserialize)]
pub struct DeckQuery {
    pub deck_id: i64,
}

/// Progress entry for one card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardProgress {
    pub card_id: i64,
    #[serde(flatten)]
    pub stats: CardStats,
}

/// Progress list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressListResponse {
    pub progress: Vec<CardProgress>,
}

/// Single answer outcome
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressEventRequest {
    pub card_id: i64,
    pub outcome: Outcome,
}

/// Save session request
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveSessionRequest {
    pub deck_id: i64,
    pub mode: StudyMode,
    pub total_answered: u32,
    pub correct: u32,
    pub started_at: Option<DateTime<Utc>>,
}

/// Session list query
#[derive(Debug, Deserialize)]
pub struct SessionListQuery {
    pub deck_id: Option<i64>,
    pub limit: Option<i64>,
}

/// Session list response
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionRecord>,
}

/// Normal-mode study queue
#[derive(Debug, Serialize, Deserialize)]
pub struct StudyQueueResponse {
    pub deck: DeckInfo,
    pub cards: Vec<Card>,
}

/// Endless-mode next card
#[derive(Debug, Serialize, Deserialize)]
pub struct NextCardResponse {
    pub card: Card,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CardStats>,
    pub weight: f64,
}

/// Typed answer submission
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub card_id: i64,
    pub answer: String,
}

/// Graded answer
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub card_id: i64,
    pub outcome: Outcome,
    pub grade: AnswerGrade,
    pub expected_answer: String,
    pub explanation: Option<String>,
    pub stats: CardStats,
}
