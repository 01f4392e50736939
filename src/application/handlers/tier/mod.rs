//! Tier handlers.
//!
//! Command and query handlers for the tier payment model:
//!
//! ## Commands
//! - Creating or updating a tier configuration (with indigent provisioning)
//!
//! ## Queries
//! - Resolving the price of a level
//! - Listing the price schedule of a region and classification
//! - Listing the configurations of a region

mod get_tier_configurations;
mod list_price_schedule;
mod resolve_payment;
mod save_tier_configuration;

// Commands
pub use save_tier_configuration::{
    SaveOutcome, SaveTierConfigurationCommand, SaveTierConfigurationHandler,
    SaveTierConfigurationResult,
};

// Queries
pub use get_tier_configurations::{GetTierConfigurationsHandler, GetTierConfigurationsQuery};
pub use list_price_schedule::{ListPriceScheduleHandler, ListPriceScheduleQuery, PriceSchedule};
pub use resolve_payment::{ResolvePaymentQuery, TierResolver};
