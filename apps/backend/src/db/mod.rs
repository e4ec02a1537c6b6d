//! PostgreSQL database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Map constraint violations on insert/update to client errors
fn map_constraint(err: sqlx::Error, conflict: &str, missing: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return ApiError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return ApiError::NotFound(missing.to_string());
        }
    }
    ApiError::Database(err)
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Database(e.into()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a new user with generated token
    pub async fn create_user(&self, name: Option<&str>) -> Result<User> {
        let token = Uuid::new_v4().to_string();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (token, name)
            VALUES ($1, $2)
            RETURNING id, token, name, created_at, last_seen_at
            "#,
        )
        .bind(&token)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, token, name, created_at, last_seen_at
            FROM users
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // === Deck Repository ===

    /// Get all decks ordered by name
    pub async fn list_decks(&self) -> Result<Vec<DbDeck>> {
        let decks = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, name, review_level, next_review_at
            FROM decks
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get decks that are due at `now`, most overdue first
    pub async fn list_due_decks(&self, now: DateTime<Utc>) -> Result<Vec<DbDeck>> {
        let decks = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, name, review_level, next_review_at
            FROM decks
            WHERE next_review_at IS NULL OR next_review_at <= $1
            ORDER BY next_review_at NULLS FIRST, name
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(decks)
    }

    /// Get deck by ID
    pub async fn get_deck(&self, deck_id: i64) -> Result<Option<DbDeck>> {
        let deck = sqlx::query_as::<_, DbDeck>(
            r#"
            SELECT id, name, review_level, next_review_at
            FROM decks
            WHERE id = $1
            "#,
        )
        .bind(deck_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deck)
    }

    /// Create a deck; names are unique
    pub async fn create_deck(&self, name: &str) -> Result<DbDeck> {
        sqlx::query_as::<_, DbDeck>(
            r#"
            INSERT INTO decks (name)
            VALUES ($1)
            RETURNING id, name, review_level, next_review_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Deck name already exists", "Deck not found"))
    }

    // === Card Repository ===

    /// Get all cards, optionally filtered by deck
    pub async fn list_cards(&self, deck_id: Option<i64>) -> Result<Vec<DbCard>> {
        let cards = match deck_id {
            Some(id) => {
                sqlx::query_as::<_, DbCard>(
                    r#"
                    SELECT id, deck_id, question, answer, explanation, image_path,
                           explanation_image_path, created_at, updated_at
                    FROM cards
                    WHERE deck_id = $1
                    ORDER BY id
                    "#,
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbCard>(
                    r#"
                    SELECT id, deck_id, question, answer, explanation, image_path,
                           explanation_image_path, created_at, updated_at
                    FROM cards
                    ORDER BY id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(cards)
    }

    /// Get card by ID
    pub async fn get_card(&self, card_id: i64) -> Result<Option<DbCard>> {
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            SELECT id, deck_id, question, answer, explanation, image_path,
                   explanation_image_path, created_at, updated_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(card_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Insert a card into an existing deck
    pub async fn create_card(&self, card: &CreateCardRequest) -> Result<DbCard> {
        sqlx::query_as::<_, DbCard>(
            r#"
            INSERT INTO cards (deck_id, question, answer, explanation, image_path, explanation_image_path)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, deck_id, question, answer, explanation, image_path,
                      explanation_image_path, created_at, updated_at
            "#,
        )
        .bind(card.deck_id)
        .bind(&card.question)
        .bind(&card.answer)
        .bind(&card.explanation)
        .bind(&card.image_path)
        .bind(&card.explanation_image_path)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Card already exists", "Deck not found"))
    }

    /// Update question, answer and explanation of a card
    pub async fn update_card(&self, card_id: i64, update: &UpdateCardRequest) -> Result<Option<DbCard>> {
        let card = sqlx::query_as::<_, DbCard>(
            r#"
            UPDATE cards
            SET question = $2, answer = $3, explanation = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, deck_id, question, answer, explanation, image_path,
                      explanation_image_path, created_at, updated_at
            "#,
        )
        .bind(card_id)
        .bind(&update.question)
        .bind(&update.answer)
        .bind(&update.explanation)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Delete a card and its progress
    pub async fn delete_card(&self, card_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(card_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Progress Repository ===

    /// Get a user's progress for every card of a deck
    pub async fn get_progress_for_deck(&self, user_id: Uuid, deck_id: i64) -> Result<Vec<DbCardProgress>> {
        let rows = sqlx::query_as::<_, DbCardProgress>(
            r#"
            SELECT cp.card_id, cp.seen, cp.correct, cp.last_outcome
            FROM card_progress cp
            JOIN cards c ON cp.card_id = c.id
            WHERE cp.user_id = $1 AND c.deck_id = $2
            ORDER BY cp.card_id
            "#,
        )
        .bind(user_id)
        .bind(deck_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Record one answer outcome, returning the updated progress
    pub async fn record_outcome(
        &self,
        user_id: Uuid,
        card_id: i64,
        outcome: Outcome,
    ) -> Result<DbCardProgress> {
        let correct = i32::from(outcome == Outcome::Correct);

        sqlx::query_as::<_, DbCardProgress>(
            r#"
            INSERT INTO card_progress (user_id, card_id, seen, correct, last_outcome)
            VALUES ($1, $2, 1, $3, $4)
            ON CONFLICT (user_id, card_id) DO UPDATE SET
                seen = card_progress.seen + 1,
                correct = card_progress.correct + EXCLUDED.correct,
                last_outcome = EXCLUDED.last_outcome
            RETURNING card_id, seen, correct, last_outcome
            "#,
        )
        .bind(user_id)
        .bind(card_id)
        .bind(correct)
        .bind(outcome.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Progress already exists", "Card not found"))
    }

    // === Session Repository ===

    /// Append a finished session
    pub async fn insert_session(&self, session: &NewSession) -> Result<DbSession> {
        sqlx::query_as::<_, DbSession>(
            r#"
            WITH inserted AS (
                INSERT INTO sessions (user_id, deck_id, mode, total_answered, correct,
                                      accuracy, started_at, finished_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, deck_id, mode, total_answered, correct, accuracy,
                          started_at, finished_at
            )
            SELECT i.id, i.deck_id, d.name AS deck_name, i.mode, i.total_answered,
                   i.correct, i.accuracy, i.started_at, i.finished_at
            FROM inserted i
            JOIN decks d ON d.id = i.deck_id
            "#,
        )
        .bind(session.user_id)
        .bind(session.deck_id)
        .bind(session.mode.as_str())
        .bind(session.total_answered)
        .bind(session.correct)
        .bind(f64::from(session.accuracy))
        .bind(session.started_at)
        .bind(session.finished_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint(e, "Session already exists", "Deck not found"))
    }

    /// Get a user's sessions, newest first
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        deck_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<DbSession>> {
        let sessions = match deck_id {
            Some(id) => {
                sqlx::query_as::<_, DbSession>(
                    r#"
                    SELECT s.id, s.deck_id, d.name AS deck_name, s.mode, s.total_answered,
                           s.correct, s.accuracy, s.started_at, s.finished_at
                    FROM sessions s
                    JOIN decks d ON s.deck_id = d.id
                    WHERE s.user_id = $1 AND s.deck_id = $2
                    ORDER BY s.started_at DESC
                    LIMIT $3
                    "#,
                )
                .bind(user_id)
                .bind(id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbSession>(
                    r#"
                    SELECT s.id, s.deck_id, d.name AS deck_name, s.mode, s.total_answered,
                           s.correct, s.accuracy, s.started_at, s.finished_at
                    FROM sessions s
                    JOIN decks d ON s.deck_id = d.id
                    WHERE s.user_id = $1
                    ORDER BY s.started_at DESC
                    LIMIT $2
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(sessions)
    }
}
