//! # Busdesk API
//!
//! JSON HTTP server behind the vendor dashboards.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          API Server                                     │
//! │                                                                         │
//! │  Dashboard ──► axum (8080) ──► CompanyScope (JWT) ──► handlers         │
//! │                                                         │               │
//! │                          ┌──────────────────────────────┼─────────┐     │
//! │                          ▼                              ▼         ▼     │
//! │                   busdesk-core rules            busdesk-db     Mailer   │
//! │                   (fares, trips, ledger)        (SQLite)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables use the `BUSDESK_`
//! prefix, e.g. `BUSDESK_JWT_SECRET`, `BUSDESK_DATABASE_PATH`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod mailer;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use busdesk_db::Database;

// Re-exports
pub use auth::{Claims, CompanyScope, JwtManager, Role};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use mailer::{LogMailer, Mailer, OutboundEmail};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<ApiConfig>,
    pub jwt: Arc<JwtManager>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig, mailer: Arc<dyn Mailer>) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.token_lifetime_secs);
        AppState {
            db,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            mailer,
        }
    }
}

/// Builds the full router with tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
