//! HTTP adapters - REST API implementations.

pub mod tier;

use axum::Router;

pub use tier::{tier_router, TierAppState};

/// Complete API router with state applied, mounted under `/api`.
///
/// Middleware (tracing, CORS, timeouts) is layered on by the binary.
pub fn api_router(state: TierAppState) -> Router {
    Router::new().nest("/api", tier_router()).with_state(state)
}
