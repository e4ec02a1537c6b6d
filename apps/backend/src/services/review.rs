//! Deck scheduling after a completed study run.
//!
//! Count-then-write is done inside one transaction that holds a
//! transaction-scoped advisory lock, so two runs finishing at the same time
//! cannot both see room on a day and overfill it.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use review_core::{parse_completed_at, DeckId, ReviewScheduler, RunScore, ScheduledReview};
use sqlx::{PgConnection, Postgres, Transaction};

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::{CompleteRunRequest, DbDeck};

/// Advisory lock key shared by every deck schedule write
const SCHEDULE_LOCK_KEY: i64 = 0x5245_5649_4557; // "REVIEW"

/// Counts scheduled decks through an open transaction
pub struct PgCapacity<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgCapacity<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

/// Half-open UTC range covering `day`
fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[async_trait]
impl review_core::CapacityOracle for PgCapacity<'_> {
    type Error = sqlx::Error;

    async fn count_scheduled(
        &mut self,
        day: NaiveDate,
        exclude_deck: DeckId,
    ) -> std::result::Result<u32, sqlx::Error> {
        let (start, end) = day_bounds(day);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM decks
            WHERE next_review_at >= $1 AND next_review_at < $2 AND id <> $3
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(exclude_deck)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

/// Score a finished run, move the deck on the ladder and book its next review day.
///
/// Validation failures return before anything is written. Level and date are
/// committed together or not at all.
pub async fn complete_run(
    db: &Database,
    scheduler: &ReviewScheduler,
    deck_id: i64,
    request: &CompleteRunRequest,
) -> Result<(DbDeck, ScheduledReview)> {
    let score = RunScore::new(request.correct_count, request.total_count)?;
    let completed_at = parse_completed_at(request.completed_at.as_deref(), Utc::now())?;

    let mut tx: Transaction<'_, Postgres> = db.pool().begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEDULE_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    let deck = sqlx::query_as::<_, DbDeck>(
        r#"
        SELECT id, name, review_level, next_review_at
        FROM decks
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(deck_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound("Deck not found".to_string()))?;

    let review = {
        let mut capacity = PgCapacity::new(&mut *tx);
        scheduler
            .schedule(&deck.to_core_deck(), score, completed_at, &mut capacity)
            .await?
    };

    let updated = sqlx::query_as::<_, DbDeck>(
        r#"
        UPDATE decks
        SET review_level = $2, next_review_at = $3
        WHERE id = $1
        RETURNING id, name, review_level, next_review_at
        "#,
    )
    .bind(deck_id)
    .bind(review.review_level)
    .bind(review.next_review_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        deck_id,
        score = review.score_percent,
        from_level = deck.review_level,
        to_level = review.review_level,
        next_review_at = %review.next_review_at,
        "Scheduled deck review"
    );

    Ok((updated, review))
}
