//! Axum router configuration for tier endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_price_schedule, list_tier_configurations, resolve_payment, save_tier_configuration,
    TierAppState,
};

/// Create the tier API router.
///
/// # Routes
/// - `POST /` - Create or update a tier configuration
/// - `GET /?region=` - List every configuration of a region
/// - `GET /payment?region=&classification=&level=` - Resolve a level's payment
/// - `GET /schedule?region=&classification=` - List a price schedule
pub fn tier_routes() -> Router<TierAppState> {
    Router::new()
        .route("/", post(save_tier_configuration).get(list_tier_configurations))
        .route("/payment", get(resolve_payment))
        .route("/schedule", get(get_price_schedule))
}

/// Create the complete tier module router, suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use membership_tiers::adapters::http::tier::{tier_router, TierAppState};
///
/// let app = Router::new()
///     .nest("/api", tier_router())
///     .with_state(TierAppState::from_store(store));
/// ```
pub fn tier_router() -> Router<TierAppState> {
    Router::new().nest("/tiers", tier_routes())
}
