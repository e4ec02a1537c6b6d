//! Error types for review-core.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias using ScheduleError.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors that can occur while scoring a run or scheduling a deck.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid completion date: {0}")]
    InvalidCompletionDate(String),

    #[error("invalid score: {correct} correct out of {total}")]
    InvalidScore { correct: u32, total: u32 },

    #[error("no review slot found within {days} days of {start}")]
    NoCapacity { start: NaiveDate, days: u32 },

    #[error("capacity lookup failed: {0}")]
    Capacity(#[source] Box<dyn std::error::Error + Send + Sync>),
}
