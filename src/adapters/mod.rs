//! Adapters - Implementations of ports for specific technologies.
//!
//! - `http` - axum REST endpoints
//! - `memory` - In-process storage for development and tests
//! - `postgres` - PostgreSQL storage via sqlx

pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryTierConfigurationRepository;
pub use postgres::PostgresTierConfigurationRepository;
