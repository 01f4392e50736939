//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTierConfigurationRepository` - Tier configuration reads and writes

mod tier_configuration_repository;

pub use tier_configuration_repository::PostgresTierConfigurationRepository;
