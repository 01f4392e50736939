//! In-memory implementation of the tier configuration ports.
//!
//! All writes take the single write guard, so the check-then-insert in
//! `create_with_indigent_sibling` is atomic with respect to other callers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::membership::{TierConfiguration, TierKey};
use crate::ports::{CreateOutcome, TierConfigurationReader, TierConfigurationRepository};

/// Tier configurations keyed by `(region, classification, is_paying)`.
#[derive(Debug, Clone)]
pub struct InMemoryTierConfigurationRepository {
    rows: Arc<RwLock<HashMap<TierKey, TierConfiguration>>>,
}

impl InMemoryTierConfigurationRepository {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored rows (useful for tests).
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for InMemoryTierConfigurationRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn already_exists(key: &TierKey) -> DomainError {
    DomainError::new(
        ErrorCode::TierConfigurationExists,
        format!("Tier configuration already exists: {}", key),
    )
}

#[async_trait]
impl TierConfigurationRepository for InMemoryTierConfigurationRepository {
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn create(&self, config: &TierConfiguration) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let key = config.key();
        if rows.contains_key(&key) {
            return Err(already_exists(&key));
        }
        rows.insert(key, config.clone());
        Ok(())
    }

    async fn create_with_indigent_sibling(
        &self,
        paying: &TierConfiguration,
        sibling: &TierConfiguration,
    ) -> Result<CreateOutcome, DomainError> {
        let mut rows = self.rows.write().await;

        let paying_key = paying.key();
        if rows.contains_key(&paying_key) {
            return Err(already_exists(&paying_key));
        }

        let sibling_key = sibling.key();
        let indigent_sibling_created = !rows.contains_key(&sibling_key);
        if indigent_sibling_created {
            rows.insert(sibling_key, sibling.clone());
        }
        rows.insert(paying_key, paying.clone());

        Ok(CreateOutcome {
            indigent_sibling_created,
        })
    }

    async fn update(&self, config: &TierConfiguration) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        let stored = rows
            .values_mut()
            .find(|row| row.id == config.id)
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::NotFound,
                    format!("Tier configuration not found: {}", config.id),
                )
            })?;

        stored.levels = config.levels;
        stored.payments = config.payments.clone();
        stored.updated_at = config.updated_at;
        Ok(())
    }
}

#[async_trait]
impl TierConfigurationReader for InMemoryTierConfigurationRepository {
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError> {
        Ok(self.rows.read().await.get(key).cloned())
    }

    async fn list_by_region(&self, region: &str) -> Result<Vec<TierConfiguration>, DomainError> {
        let region = region.trim();
        let rows = self.rows.read().await;
        let mut matching: Vec<TierConfiguration> = rows
            .values()
            .filter(|row| row.region == region)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.classification
                .as_str()
                .cmp(b.classification.as_str())
                .then(b.is_paying.cmp(&a.is_paying))
        });
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::{AreaClassification, LevelsSpec};

    fn paying(region: &str, classification: AreaClassification) -> TierConfiguration {
        let (levels, payments) = match classification {
            AreaClassification::Mixed => (LevelsSpec::Split { urban: 1, rural: 1 }, vec![80.0, 40.0]),
            _ => (LevelsSpec::Flat(2), vec![50.0, 75.0]),
        };
        TierConfiguration::new(region, classification, levels, payments, true)
    }

    #[tokio::test]
    async fn create_rejects_duplicate_key() {
        let repo = InMemoryTierConfigurationRepository::new();
        let config = paying("Bahir Dar", AreaClassification::Rural);
        repo.create(&config).await.unwrap();

        let err = repo
            .create(&paying("Bahir Dar", AreaClassification::Rural))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::TierConfigurationExists);
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn create_with_sibling_inserts_both_rows() {
        let repo = InMemoryTierConfigurationRepository::new();
        let config = paying("Bahir Dar", AreaClassification::Urban);

        let outcome = repo
            .create_with_indigent_sibling(&config, &config.indigent_sibling())
            .await
            .unwrap();

        assert!(outcome.indigent_sibling_created);
        assert_eq!(repo.len().await, 2);
        let sibling = TierConfigurationRepository::find_by_key(&repo, &config.key().indigent())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sibling.payments, vec![0.0]);
    }

    #[tokio::test]
    async fn existing_sibling_is_left_alone() {
        let repo = InMemoryTierConfigurationRepository::new();
        let config = paying("Bahir Dar", AreaClassification::Urban);
        let original_sibling = config.indigent_sibling();
        repo.create(&original_sibling).await.unwrap();

        let outcome = repo
            .create_with_indigent_sibling(&config, &config.indigent_sibling())
            .await
            .unwrap();

        assert!(!outcome.indigent_sibling_created);
        let stored = TierConfigurationReader::find_by_key(&repo, &config.key().indigent())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, original_sibling.id);
    }

    #[tokio::test]
    async fn failed_create_writes_nothing() {
        let repo = InMemoryTierConfigurationRepository::new();
        let config = paying("Bahir Dar", AreaClassification::Rural);
        repo.create(&config).await.unwrap();

        let duplicate = paying("Bahir Dar", AreaClassification::Rural);
        let result = repo
            .create_with_indigent_sibling(&duplicate, &duplicate.indigent_sibling())
            .await;

        assert!(result.is_err());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn concurrent_first_creations_provision_one_sibling() {
        let repo = InMemoryTierConfigurationRepository::new();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let repo = repo.clone();
            tasks.push(tokio::spawn(async move {
                let config = paying("Gondar", AreaClassification::Mixed);
                repo.create_with_indigent_sibling(&config, &config.indigent_sibling())
                    .await
            }));
        }

        let mut created = 0;
        let mut siblings = 0;
        for task in tasks {
            if let Ok(outcome) = task.await.unwrap() {
                created += 1;
                if outcome.indigent_sibling_created {
                    siblings += 1;
                }
            }
        }

        assert_eq!(created, 1);
        assert_eq!(siblings, 1);
        assert_eq!(repo.len().await, 2);
    }

    #[tokio::test]
    async fn update_replaces_levels_and_payments() {
        let repo = InMemoryTierConfigurationRepository::new();
        let config = paying("Bahir Dar", AreaClassification::Rural);
        repo.create(&config).await.unwrap();

        let revised = config.revise(LevelsSpec::Flat(3), vec![10.0, 20.0, 30.0]);
        repo.update(&revised).await.unwrap();

        let stored = TierConfigurationReader::find_by_key(&repo, &config.key())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, config.id);
        assert_eq!(stored.levels, LevelsSpec::Flat(3));
        assert_eq!(stored.payments, vec![10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let repo = InMemoryTierConfigurationRepository::new();
        let err = repo
            .update(&paying("Bahir Dar", AreaClassification::Rural))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn list_by_region_orders_rows() {
        let repo = InMemoryTierConfigurationRepository::new();
        for classification in AreaClassification::ALL {
            let config = paying("Gondar", classification);
            repo.create_with_indigent_sibling(&config, &config.indigent_sibling())
                .await
                .unwrap();
        }
        repo.create(&paying("Elsewhere", AreaClassification::Rural))
            .await
            .unwrap();

        let rows = repo.list_by_region(" Gondar ").await.unwrap();

        let keys: Vec<_> = rows
            .iter()
            .map(|row| (row.classification, row.is_paying))
            .collect();
        assert_eq!(
            keys,
            vec![
                (AreaClassification::Mixed, true),
                (AreaClassification::Mixed, false),
                (AreaClassification::Rural, true),
                (AreaClassification::Rural, false),
                (AreaClassification::Urban, true),
                (AreaClassification::Urban, false),
            ]
        );
    }
}
