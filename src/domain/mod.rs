//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `membership` - Tier configurations, validation, and payment resolution

pub mod foundation;
pub mod membership;
