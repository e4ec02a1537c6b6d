//! Deck-level review scheduling.
//!
//! A deck climbs a fixed ladder of intervals when a run goes well and slides
//! back down when it goes badly. The next review lands on a UTC calendar day
//! that still has room under the per-day deck limit.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::types::{Deck, DeckId};

/// Days until the next review, indexed by review level.
pub const REVIEW_INTERVALS_DAYS: [u32; 7] = [1, 3, 7, 14, 30, 60, 120];

/// Highest review level.
pub const MAX_LEVEL: i32 = REVIEW_INTERVALS_DAYS.len() as i32 - 1;

/// Default number of decks that may be due on the same day.
pub const MAX_DECKS_PER_DAY: u32 = 10;

/// Default number of days the capacity search looks ahead before giving up.
pub const MAX_SEARCH_DAYS: u32 = 730;

/// Score (percent) at or above which a deck moves up a level.
pub const PROMOTE_AT_PERCENT: f64 = 85.0;

/// Score (percent) at or above which a deck keeps its level.
pub const KEEP_AT_PERCENT: f64 = 60.0;

/// Clamp a review level to the ladder.
pub fn clamp_level(level: i32) -> i32 {
    level.clamp(0, MAX_LEVEL)
}

/// New review level after a run that scored `score_percent`.
pub fn adjust_review_level(score_percent: f64, current_level: i32) -> i32 {
    let level = clamp_level(current_level);
    if score_percent >= PROMOTE_AT_PERCENT {
        clamp_level(level + 1)
    } else if score_percent >= KEEP_AT_PERCENT {
        level
    } else {
        clamp_level(level - 1)
    }
}

/// Interval in days for a review level, clamped to the ladder.
pub fn interval_days(level: i32) -> u32 {
    REVIEW_INTERVALS_DAYS[clamp_level(level) as usize]
}

/// Midnight UTC of the calendar day containing `at`.
pub fn truncate_to_utc_date(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Move `at` forward by whole days.
pub fn add_days(at: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    at + Duration::days(days)
}

/// Parse the completion time of a run. An absent value means `now`.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` (taken as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_completed_at(raw: Option<&str>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let Some(raw) = raw else {
        return Ok(now);
    };
    let value = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(at.and_utc());
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ScheduleError::InvalidCompletionDate(raw.to_string()))
}

/// Validated score of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunScore {
    correct: u32,
    total: u32,
}

impl RunScore {
    /// Rejects empty runs and more correct answers than answers.
    pub fn new(correct: u32, total: u32) -> Result<Self> {
        if total == 0 || correct > total {
            return Err(ScheduleError::InvalidScore { correct, total });
        }
        Ok(Self { correct, total })
    }

    /// Number of correct answers.
    pub fn correct(&self) -> u32 {
        self.correct
    }

    /// Number of answers.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Score as a percentage in [0, 100].
    pub fn percent(&self) -> f64 {
        self.correct as f64 * 100.0 / self.total as f64
    }
}

/// Source of how many decks are already due on a given day.
///
/// Implementations count decks whose `next_review_at` falls within
/// `[day 00:00 UTC, next day 00:00 UTC)`, leaving out `exclude_deck`.
#[async_trait]
pub trait CapacityOracle: Send {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn count_scheduled(
        &mut self,
        day: NaiveDate,
        exclude_deck: DeckId,
    ) -> std::result::Result<u32, Self::Error>;
}

/// First day on or after `base` with fewer than `max_per_day` decks scheduled.
///
/// Gives up with [`ScheduleError::NoCapacity`] after `max_search_days` days.
pub async fn find_available_review_date<O>(
    base: DateTime<Utc>,
    exclude_deck: DeckId,
    oracle: &mut O,
    max_per_day: u32,
    max_search_days: u32,
) -> Result<DateTime<Utc>>
where
    O: CapacityOracle + ?Sized,
{
    let start = truncate_to_utc_date(base);

    for offset in 0..max_search_days {
        let date = add_days(start, i64::from(offset));
        let scheduled = oracle
            .count_scheduled(date.date_naive(), exclude_deck)
            .await
            .map_err(|e| ScheduleError::Capacity(Box::new(e)))?;

        if scheduled < max_per_day {
            return Ok(date);
        }
    }

    Err(ScheduleError::NoCapacity {
        start: start.date_naive(),
        days: max_search_days,
    })
}

/// Outcome of scheduling a deck after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReview {
    pub review_level: i32,
    pub interval_days: u32,
    pub next_review_at: DateTime<Utc>,
    pub score_percent: f64,
}

/// Deck scheduler with its capacity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewScheduler {
    pub max_per_day: u32,
    pub max_search_days: u32,
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self {
            max_per_day: MAX_DECKS_PER_DAY,
            max_search_days: MAX_SEARCH_DAYS,
        }
    }
}

impl ReviewScheduler {
    pub fn new(max_per_day: u32, max_search_days: u32) -> Self {
        Self {
            max_per_day,
            max_search_days,
        }
    }

    /// Work out the deck's new level and next review date.
    ///
    /// The deck itself is not modified; callers persist the returned level and
    /// date together.
    pub async fn schedule<O>(
        &self,
        deck: &Deck,
        score: RunScore,
        completed_at: DateTime<Utc>,
        oracle: &mut O,
    ) -> Result<ScheduledReview>
    where
        O: CapacityOracle + ?Sized,
    {
        let score_percent = score.percent();
        let review_level = adjust_review_level(score_percent, deck.review_level);
        let interval_days = interval_days(review_level);

        let base = add_days(completed_at, i64::from(interval_days));
        let next_review_at = find_available_review_date(
            base,
            deck.id,
            oracle,
            self.max_per_day,
            self.max_search_days,
        )
        .await?;

        Ok(ScheduledReview {
            review_level,
            interval_days,
            next_review_at,
            score_percent,
        })
    }
}
