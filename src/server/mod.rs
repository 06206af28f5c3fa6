//! REST server.
//!
//! Axum router over the SQLite-backed services. The connection sits behind a
//! mutex in shared state; SQLite serializes writes underneath it.

pub mod config;
pub mod error;
mod extract;
mod routes;

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::services::auth::TokenService;
use crate::services::database::Database;

pub use config::ServerConfig;
pub use error::ApiError;
pub use extract::CurrentUser;

/// Shared state behind every handler.
pub struct AppContext {
    db: Mutex<Database>,
    tokens: TokenService,
}

pub type AppState = Arc<AppContext>;

impl AppContext {
    pub fn new(db: Database, tokens: TokenService) -> AppState {
        Arc::new(Self {
            db: Mutex::new(db),
            tokens,
        })
    }

    pub(crate) fn db(&self) -> Result<MutexGuard<'_, Database>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal(anyhow::anyhow!("Database lock poisoned")))
    }

    pub(crate) fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

/// Build the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/categories",
            get(routes::categories::list).post(routes::categories::create),
        )
        .route(
            "/api/categories/:id",
            put(routes::categories::update).delete(routes::categories::remove),
        )
        .route(
            "/api/events",
            get(routes::events::list).post(routes::events::create),
        )
        .route(
            "/api/events/:id",
            put(routes::events::update).delete(routes::events::remove),
        )
        .route(
            "/api/users",
            get(routes::users::list).post(routes::users::create),
        )
        .route(
            "/api/users/:id",
            put(routes::users::update).delete(routes::users::remove),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Open the database, run schema setup, and serve until shutdown.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let db = Database::new(&config.database_path)?;
    db.initialize_schema()?;

    let tokens = TokenService::with_ttl(&config.jwt_secret, config.token_ttl_hours);
    let state = AppContext::new(db, tokens);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    log::info!("Server listening on {}", config.bind);

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
