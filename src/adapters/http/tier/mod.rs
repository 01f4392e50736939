//! HTTP adapter for tier endpoints.
//!
//! Exposes the tier payment model via REST API:
//! - `POST /api/tiers` - Create or update a tier configuration
//! - `GET /api/tiers?region=` - List a region's configurations
//! - `GET /api/tiers/payment?region=&classification=&level=` - Resolve a payment
//! - `GET /api/tiers/schedule?region=&classification=` - List a price schedule

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{TierApiError, TierAppState};
pub use routes::{tier_router, tier_routes};
