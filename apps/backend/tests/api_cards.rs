//! Card API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use serde_json::json;

use common::TestContext;

/// Card CRUD within one deck.
#[tokio::test]
#[ignore = "requires database"]
async fn test_card_lifecycle() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (user_id, token) = ctx.create_test_user(None).await;
    let deck = ctx.create_test_deck("Cards").await;

    let created = server
        .post("/api/cards")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({
            "deck_id": deck.id,
            "question": " Capital of France? ",
            "answer": " Paris ",
            "explanation": "   ",
            "image_path": "images/france.png",
        }))
        .await;
    created.assert_status_ok();
    let card: serde_json::Value = created.json();
    assert_eq!(card["question"], "Capital of France?");
    assert_eq!(card["answer"], "Paris");
    assert!(card["explanation"].is_null());
    assert_eq!(card["image_path"], "images/france.png");
    let card_id = card["id"].as_i64().unwrap();

    let listed = server
        .get("/api/cards")
        .add_query_param("deck_id", deck.id)
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    listed.assert_status_ok();
    let body: serde_json::Value = listed.json();
    assert_eq!(body["cards"].as_array().unwrap().len(), 1);

    let updated = server
        .put(&format!("/api/cards/{}", card_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({
            "question": "Capital of France?",
            "answer": "Paris",
            "explanation": "Seat of government since 1944.",
        }))
        .await;
    updated.assert_status_ok();
    let card: serde_json::Value = updated.json();
    assert_eq!(card["explanation"], "Seat of government since 1944.");

    let deleted = server
        .delete(&format!("/api/cards/{}", card_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    deleted.assert_status_ok();
    deleted.assert_json(&json!({ "success": true }));

    let again = server
        .delete(&format!("/api/cards/{}", card_id))
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_decks(&[deck.id]).await;
    ctx.cleanup_user(user_id).await;
}

/// Blank answers and unknown decks are rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_card_validation() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (user_id, token) = ctx.create_test_user(None).await;
    let deck = ctx.create_test_deck("Validation").await;

    let blank = server
        .post("/api/cards")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "deck_id": deck.id, "question": "Q?", "answer": "  " }))
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);

    let missing_deck = server
        .post("/api/cards")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "deck_id": 987654321, "question": "Q?", "answer": "A" }))
        .await;
    missing_deck.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_decks(&[deck.id]).await;
    ctx.cleanup_user(user_id).await;
}

/// Updating an unknown card is 404.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_unknown_card() {
    let ctx = TestContext::new().await;
    let server = ctx.server();
    let (user_id, token) = ctx.create_test_user(None).await;

    let response = server
        .put("/api/cards/987654321")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&json!({ "question": "Q?", "answer": "A" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}
