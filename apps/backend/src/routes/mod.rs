//! HTTP route handlers

pub mod auth;
pub mod cards;
pub mod decks;
pub mod progress;
pub mod sessions;
pub mod study;
pub mod users;
