//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `TierConfigurationReader` - Keyed lookups for resolution and listings
//! - `TierConfigurationRepository` - Writes, including atomic indigent provisioning

mod tier_configuration_reader;
mod tier_configuration_repository;

pub use tier_configuration_reader::TierConfigurationReader;
pub use tier_configuration_repository::{CreateOutcome, TierConfigurationRepository};
