//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/bet/place", post(place_bet_handler))
        .route("/api/bet/many-spins", post(many_spins_handler))
        .route("/api/bet/symbols", get(symbols_handler))
        .fallback(not_found_handler)
        .with_state(state)
}
