//! Tier configuration reader port (read side).
//!
//! Keyed lookups used by payment resolution and price listings.
//! Resolution only ever needs a single row per key, so implementations
//! should serve `find_by_key` from the unique `(region, classification,
//! is_paying)` index rather than scanning.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::membership::{TierConfiguration, TierKey};

/// Read-only access to stored tier configurations.
///
/// Implementations must give at least read-committed consistency per call.
#[async_trait]
pub trait TierConfigurationReader: Send + Sync {
    /// Find the configuration stored under a key.
    ///
    /// Returns `None` if nothing is configured for the key.
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError>;

    /// List every configuration for a region, ordered by classification with
    /// the paying row before the indigent one.
    async fn list_by_region(&self, region: &str) -> Result<Vec<TierConfiguration>, DomainError>;
}
