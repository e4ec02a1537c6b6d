//! Review engine shared by the flashcard backend.
//!
//! Provides:
//! - Fuzzy answer matching for typed answers (Levenshtein distance)
//! - Adaptive card weighting for endless study sessions
//! - Deck review scheduling on a fixed interval ladder with per-day capacity
//! - Shared types (Card, Deck, CardStats, Outcome, etc.)

pub mod error;
pub mod matching;
pub mod schedule;
pub mod study;
pub mod types;
pub mod weighting;

pub use error::{Result, ScheduleError};
pub use matching::{grade_answer, is_fuzzy_match, levenshtein_distance, normalize_answer, AnswerGrade};
pub use schedule::{
    adjust_review_level, find_available_review_date, interval_days, parse_completed_at,
    truncate_to_utc_date, CapacityOracle, ReviewScheduler, RunScore, ScheduledReview,
};
pub use study::{compute_accuracy, describe_next_review, shuffle_cards};
pub use types::{Card, CardId, CardStats, Deck, DeckId, Outcome, SessionRecord, StatsByCard, StudyMode};
pub use weighting::{card_weight, choose_weighted_index};
