//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod tier;

pub use tier::{
    GetTierConfigurationsHandler, GetTierConfigurationsQuery, ListPriceScheduleHandler,
    ListPriceScheduleQuery, PriceSchedule, ResolvePaymentQuery, SaveOutcome,
    SaveTierConfigurationCommand, SaveTierConfigurationHandler, SaveTierConfigurationResult,
    TierResolver,
};
