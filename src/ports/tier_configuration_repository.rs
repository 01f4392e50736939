//! Tier configuration repository port (write side).
//!
//! Defines the contract for persisting tier configurations.
//!
//! # Design
//!
//! - **Unique key**: at most one row per `(region, classification, is_paying)`
//! - **Atomic provisioning**: creating a paying row and its indigent sibling is
//!   one storage operation, so concurrent first creations cannot produce two
//!   siblings
//!
//! # Example
//!
//! ```ignore
//! async fn create_paying(
//!     repo: &dyn TierConfigurationRepository,
//!     config: &TierConfiguration,
//! ) -> Result<CreateOutcome, DomainError> {
//!     let sibling = config.indigent_sibling();
//!     repo.create_with_indigent_sibling(config, &sibling).await
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::membership::{TierConfiguration, TierKey};

/// What an atomic paying-row creation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateOutcome {
    /// False when an indigent row already existed for the pair.
    pub indigent_sibling_created: bool,
}

/// Repository port for tier configuration persistence.
#[async_trait]
pub trait TierConfigurationRepository: Send + Sync {
    /// Find the configuration stored under a key.
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError>;

    /// Insert a single configuration.
    ///
    /// # Errors
    ///
    /// - `TierConfigurationExists` if the key is taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, config: &TierConfiguration) -> Result<(), DomainError>;

    /// Insert a paying configuration and, unless one already exists for the
    /// same region and classification, its indigent sibling.
    ///
    /// Both writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// - `TierConfigurationExists` if the paying key is taken
    /// - `DatabaseError` on persistence failure
    async fn create_with_indigent_sibling(
        &self,
        paying: &TierConfiguration,
        sibling: &TierConfiguration,
    ) -> Result<CreateOutcome, DomainError>;

    /// Replace the levels and payments of an existing configuration.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row has this configuration's id
    /// - `DatabaseError` on persistence failure
    async fn update(&self, config: &TierConfiguration) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_configuration_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn TierConfigurationRepository) {}
    }
}
