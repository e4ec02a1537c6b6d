//! Core types for the review engine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deck identifier.
pub type DeckId = i64;

/// Card identifier.
pub type CardId = i64;

/// Per-card stats keyed by card ID.
pub type StatsByCard = HashMap<CardId, CardStats>;

/// Flashcard owned by a deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub deck_id: DeckId,
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_image_path: Option<String>,
}

/// Deck with its review schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub review_level: i32,
    pub next_review_at: Option<DateTime<Utc>>,
}

impl Deck {
    /// A deck is due when it has never been scheduled or its review time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at.map_or(true, |next| next <= now)
    }
}

/// Outcome of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Incorrect,
}

impl Outcome {
    /// Get the outcome name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            _ => None,
        }
    }

    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

/// Accumulated answer history for one card and one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    pub seen: u32,
    pub correct: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<Outcome>,
}

impl CardStats {
    /// Fold one more answer into the stats.
    pub fn record(&mut self, outcome: Outcome) {
        self.seen += 1;
        if outcome == Outcome::Correct {
            self.correct += 1;
        }
        self.last_outcome = Some(outcome);
    }

    /// Fraction of answers that were correct, if the card has been seen.
    pub fn accuracy(&self) -> Option<f64> {
        if self.seen == 0 {
            None
        } else {
            Some(self.correct as f64 / self.seen as f64)
        }
    }
}

/// Study mode of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyMode {
    Normal,
    Endless,
}

impl Default for StudyMode {
    fn default() -> Self {
        Self::Normal
    }
}

impl StudyMode {
    /// Get the mode name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Endless => "endless",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Self::Normal),
            "endless" => Some(Self::Endless),
            _ => None,
        }
    }
}

/// Historical record of a finished run. Written once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub deck_id: DeckId,
    pub deck_name: String,
    pub mode: StudyMode,
    pub total_answered: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}
