//! # Inkline Server
//!
//! HTTP API the web client talks to.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Inkline Server                                  │
//! │                                                                         │
//! │  Web client ───► axum (/api) ───► inkline-db ───► SQLite (WAL)         │
//! │                    │                  │                                 │
//! │                    │                  └── CheckoutService (sales)       │
//! │                    └── require_auth (JWT bearer)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is read first):
//! - `HTTP_PORT` - listen port (default: 5000)
//! - `DATABASE_PATH` - SQLite file (default: ./inkline.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - HS256 secret shared with the login service
//! - `RUST_LOG` - log filter (default: info)

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::router(state.clone()))
        .with_state(state)
}
