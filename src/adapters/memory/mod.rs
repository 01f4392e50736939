//! In-memory adapters.
//!
//! Backed by process memory; used for local development and tests.

mod tier_configuration_repository;

pub use tier_configuration_repository::InMemoryTierConfigurationRepository;
