//! Request Handlers
//!
//! Boundary checks happen here; the resolver only ever sees whitelisted stakes
//! and in-range spin counts.

use super::{
    errors::ApiError,
    middleware::RequestId,
    models::*,
};
use crate::{
    config::BetLimits,
    games::{BetResolver, BetResponse, SpinStats},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Shared application state
pub struct AppState {
    pub resolver: Arc<BetResolver>,
    pub limits: BetLimits,
    pub version: String,
}

impl AppState {
    pub fn new(resolver: Arc<BetResolver>, limits: BetLimits) -> Self {
        Self {
            resolver,
            limits,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check handler
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
    })
}

/// List the symbol catalog
/// GET /api/bet/symbols
pub async fn symbols_handler(State(state): State<Arc<AppState>>) -> Json<SymbolsResponse> {
    Json(SymbolsResponse::from(state.resolver.catalog()))
}

/// Resolve a single bet
/// POST /api/bet/place
pub async fn place_bet_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlaceBetRequest>, JsonRejection>,
) -> Result<Json<BetResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("[{}] Rejected bet body: {}", request_id.0, rejection.body_text());
        ApiError::bad_request(request_id.0.clone(), rejection.body_text())
    })?;

    let amount = state
        .limits
        .check_amount(request.amount)
        .map_err(|e| ApiError::from_bet_error(request_id.0.clone(), e))?;

    let result = state
        .resolver
        .place_bet(amount, &request.options)
        .map_err(|e| {
            warn!("[{}] Error placing bet: {}", request_id.0, e);
            ApiError::from_bet_error(request_id.0.clone(), e)
        })?;

    debug!(
        "[{}] Bet {} -> {:?} {} pays {}",
        request_id.0, amount, result.symbols, result.win_type, result.win_amount
    );
    Ok(Json(result))
}

/// Run a batch of spins and report aggregate statistics
/// POST /api/bet/many-spins
pub async fn many_spins_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ManySpinsRequest>, JsonRejection>,
) -> Result<Json<SpinStats>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("[{}] Rejected batch body: {}", request_id.0, rejection.body_text());
        ApiError::bad_request(request_id.0.clone(), rejection.body_text())
    })?;

    let amount = state
        .limits
        .check_amount(request.amount)
        .map_err(|e| ApiError::from_bet_error(request_id.0.clone(), e))?;
    let spins = state
        .limits
        .check_spins(request.spins)
        .map_err(|e| ApiError::from_bet_error(request_id.0.clone(), e))?;

    // Large batches are CPU bound; keep them off the async workers
    let resolver = state.resolver.clone();
    let options = request.options;
    let outcome = tokio::task::spawn_blocking(move || resolver.run_many_spins(amount, &options, spins))
        .await
        .map_err(|e| {
            error!("[{}] Spin batch task failed: {}", request_id.0, e);
            ApiError::internal_error(request_id.0.clone())
        })?;

    let stats = outcome.map_err(|e| {
        warn!("[{}] Error running many spins: {}", request_id.0, e);
        ApiError::from_bet_error(request_id.0.clone(), e)
    })?;

    Ok(Json(stats))
}

/// Fallback for unknown routes
pub async fn not_found_handler(Extension(request_id): Extension<RequestId>) -> ApiError {
    ApiError::not_found(request_id.0, "Not Found".to_string())
}
