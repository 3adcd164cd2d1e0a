//! HTTP API for the Focus Arena.
//!
//! Every route except `/health` resolves the caller from a bearer token
//! (see [`extract::CurrentUser`]) and delegates to [`ArenaService`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::arena::ArenaService;
use crate::auth::JwtManager;

pub use error::ApiError;
pub use extract::CurrentUser;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: ArenaService,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub const fn new(service: ArenaService, jwt: Arc<JwtManager>) -> Self {
        Self { service, jwt }
    }
}

/// Build the axum router with all arena routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/challenge/create", post(handlers::create_challenge))
        .route("/challenge/accept/{id}", post(handlers::accept_challenge))
        .route("/challenge/pause/{id}", post(handlers::record_pause))
        .route("/challenge/complete/{id}", post(handlers::complete_challenge))
        .route("/challenge/my", get(handlers::my_challenges))
        .route("/challenge/{id}", get(handlers::get_challenge))
        .route("/leaderboard", get(handlers::leaderboard))
        .route("/xp/log", get(handlers::xp_log))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
