//! SaveTierConfigurationHandler - Command handler for creating or updating tier configurations.
//!
//! Validation runs before anything is persisted. A first-time paying
//! configuration is stored together with its indigent sibling in one atomic
//! repository call; updates never re-provision the sibling.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::membership::{AreaClassification, LevelsSpec, TierConfiguration, TierError};
use crate::ports::TierConfigurationRepository;

/// Command to create or update the configuration for a key.
#[derive(Debug, Clone)]
pub struct SaveTierConfigurationCommand {
    pub region: String,
    pub classification: AreaClassification,
    pub levels: LevelsSpec,
    pub payments: Vec<f64>,
    pub is_paying: bool,
}

impl SaveTierConfigurationCommand {
    /// Command for a paying configuration, the usual administrative input.
    pub fn paying(
        region: impl Into<String>,
        classification: AreaClassification,
        levels: LevelsSpec,
        payments: Vec<f64>,
    ) -> Self {
        Self {
            region: region.into(),
            classification,
            levels,
            payments,
            is_paying: true,
        }
    }
}

/// Whether the save created or updated the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created { indigent_sibling_created: bool },
    Updated,
}

/// Result of a successful save.
#[derive(Debug, Clone)]
pub struct SaveTierConfigurationResult {
    pub configuration: TierConfiguration,
    /// Indigent row for the same region and classification, when the saved
    /// configuration is paying and a sibling exists.
    pub indigent_sibling: Option<TierConfiguration>,
    pub outcome: SaveOutcome,
}

/// Creates or updates the configuration stored under a key.
pub struct SaveTierConfigurationHandler {
    repository: Arc<dyn TierConfigurationRepository>,
}

impl SaveTierConfigurationHandler {
    pub fn new(repository: Arc<dyn TierConfigurationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: SaveTierConfigurationCommand,
    ) -> Result<SaveTierConfigurationResult, TierError> {
        // 1. Build and validate the candidate
        let candidate = TierConfiguration::new(
            &cmd.region,
            cmd.classification,
            cmd.levels,
            cmd.payments,
            cmd.is_paying,
        );
        if let Err(err) = candidate.validate() {
            warn!(
                region = %candidate.region,
                classification = %candidate.classification,
                error = %err,
                "Rejected tier configuration"
            );
            return Err(err.into());
        }

        // 2. Update in place if the key is taken, otherwise create
        let key = candidate.key();
        let (configuration, outcome) = match self.repository.find_by_key(&key).await? {
            Some(existing) => (
                self.update_existing(&existing, candidate).await?,
                SaveOutcome::Updated,
            ),
            None => self.create_new(candidate).await?,
        };

        // 3. Report the sibling alongside paying rows
        let indigent_sibling = if configuration.is_paying {
            self.repository.find_by_key(&key.indigent()).await?
        } else {
            None
        };

        Ok(SaveTierConfigurationResult {
            configuration,
            indigent_sibling,
            outcome,
        })
    }

    async fn create_new(
        &self,
        candidate: TierConfiguration,
    ) -> Result<(TierConfiguration, SaveOutcome), TierError> {
        let created = if candidate.is_paying {
            let sibling = candidate.indigent_sibling();
            sibling.validate().map_err(|err| {
                TierError::configuration(format!("indigent sibling for {}: {}", candidate, err))
            })?;
            self.repository
                .create_with_indigent_sibling(&candidate, &sibling)
                .await
                .map(|outcome| outcome.indigent_sibling_created)
        } else {
            self.repository.create(&candidate).await.map(|()| false)
        };

        match created {
            Ok(indigent_sibling_created) => {
                info!(
                    region = %candidate.region,
                    classification = %candidate.classification,
                    is_paying = candidate.is_paying,
                    levels = %candidate.levels,
                    indigent_sibling_created,
                    "Created tier configuration"
                );
                Ok((
                    candidate,
                    SaveOutcome::Created {
                        indigent_sibling_created,
                    },
                ))
            }
            Err(err) if err.is_conflict() => {
                // A concurrent first creation won the key; apply ours on top of it.
                let key = candidate.key();
                warn!(key = %key, "Tier configuration created concurrently, updating instead");
                let existing = self
                    .repository
                    .find_by_key(&key)
                    .await?
                    .ok_or_else(|| TierError::already_exists(key))?;
                let updated = self.update_existing(&existing, candidate).await?;
                Ok((updated, SaveOutcome::Updated))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_existing(
        &self,
        existing: &TierConfiguration,
        candidate: TierConfiguration,
    ) -> Result<TierConfiguration, TierError> {
        let updated = existing.revise(candidate.levels, candidate.payments);
        self.repository.update(&updated).await?;
        info!(
            id = %updated.id,
            region = %updated.region,
            classification = %updated.classification,
            is_paying = updated.is_paying,
            levels = %updated.levels,
            "Updated tier configuration"
        );
        Ok(updated)
    }
}
