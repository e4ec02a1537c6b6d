//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wrapping a migrated database and the full API router
//! - Helpers for creating users, decks and cards
//! - Cleanup helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL env var).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use uuid::Uuid;

use flashcards_backend::db::Database;
use flashcards_backend::models::{CreateCardRequest, DbCard, DbDeck};
use flashcards_backend::AppState;
use review_core::ReviewScheduler;

/// Test context containing database connection and router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context with the default scheduler.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        Self::with_scheduler(ReviewScheduler::default()).await
    }

    /// Create a test context with a custom capacity policy.
    pub async fn with_scheduler(scheduler: ReviewScheduler) -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);
        let app = flashcards_backend::router(AppState {
            db: db.clone(),
            scheduler,
        });

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Start an in-process test server.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Create a test user and return its ID and token.
    pub async fn create_test_user(&self, name: Option<&str>) -> (Uuid, String) {
        let user = self
            .db
            .create_user(name)
            .await
            .expect("Failed to create test user");
        (user.id, user.token)
    }

    /// Create a deck with a unique name derived from `prefix`.
    pub async fn create_test_deck(&self, prefix: &str) -> DbDeck {
        self.db
            .create_deck(&fixtures::unique_name(prefix))
            .await
            .expect("Failed to create test deck")
    }

    /// Create `count` numbered cards in a deck.
    pub async fn create_test_cards(&self, deck_id: i64, count: usize) -> Vec<DbCard> {
        let mut cards = Vec::with_capacity(count);
        for i in 0..count {
            let request: CreateCardRequest = fixtures::card_request(deck_id, i + 1);
            cards.push(
                self.db
                    .create_card(&request)
                    .await
                    .expect("Failed to create test card"),
            );
        }
        cards
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    /// Remove a user along with their progress and sessions.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }

    /// Remove decks along with their cards, progress and sessions.
    pub async fn cleanup_decks(&self, deck_ids: &[i64]) {
        let _ = sqlx::query("DELETE FROM decks WHERE id = ANY($1)")
            .bind(deck_ids)
            .execute(self.db.pool())
            .await;
    }
}
