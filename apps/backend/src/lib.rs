pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use review_core::ReviewScheduler;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: ReviewScheduler,
}

/// Build the API router. Everything except registration and health needs a user token.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // User routes
        .route("/api/users/me", get(routes::users::me))
        // Deck routes
        .route("/api/decks", get(routes::decks::list).post(routes::decks::create))
        .route("/api/decks/due", get(routes::decks::due))
        .route("/api/decks/:id/review", post(routes::decks::complete_review))
        // Card routes
        .route("/api/cards", get(routes::cards::list).post(routes::cards::create))
        .route(
            "/api/cards/:id",
            put(routes::cards::update).delete(routes::cards::delete),
        )
        // Progress routes
        .route("/api/progress/cards", get(routes::progress::list))
        .route("/api/progress/event", post(routes::progress::record))
        // Session routes
        .route(
            "/api/sessions",
            get(routes::sessions::list).post(routes::sessions::save),
        )
        // Study routes
        .route("/api/study/queue", get(routes::study::queue))
        .route("/api/study/next", get(routes::study::next))
        .route("/api/study/answer", post(routes::study::answer))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/register", post(routes::users::register))
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let scheduler = config.scheduler();
    tracing::info!(
        max_per_day = scheduler.max_per_day,
        search_days = scheduler.max_search_days,
        "Review scheduler ready"
    );

    let app = router(AppState {
        db: Arc::new(db),
        scheduler,
    });

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
