//! GetTierConfigurationsHandler - Query handler listing the configurations of a region.

use std::sync::Arc;

use crate::domain::membership::{TierConfiguration, TierError};
use crate::ports::TierConfigurationReader;

#[derive(Debug, Clone)]
pub struct GetTierConfigurationsQuery {
    pub region: String,
}

pub struct GetTierConfigurationsHandler {
    reader: Arc<dyn TierConfigurationReader>,
}

impl GetTierConfigurationsHandler {
    pub fn new(reader: Arc<dyn TierConfigurationReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetTierConfigurationsQuery,
    ) -> Result<Vec<TierConfiguration>, TierError> {
        let region = query.region.trim();
        if region.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.reader.list_by_region(region).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTierConfigurationRepository;
    use crate::domain::membership::{AreaClassification, LevelsSpec};
    use crate::ports::TierConfigurationRepository;

    #[tokio::test]
    async fn lists_paying_and_indigent_rows() {
        let repo = Arc::new(InMemoryTierConfigurationRepository::new());
        let paying = TierConfiguration::new(
            "Test Region",
            AreaClassification::Urban,
            LevelsSpec::Flat(2),
            vec![100.0, 150.0],
            true,
        );
        repo.create_with_indigent_sibling(&paying, &paying.indigent_sibling())
            .await
            .unwrap();
        let handler = GetTierConfigurationsHandler::new(repo);

        let rows = handler
            .handle(GetTierConfigurationsQuery {
                region: "Test Region ".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_paying);
        assert!(!rows[1].is_paying);
    }

    #[tokio::test]
    async fn blank_region_lists_nothing() {
        let handler =
            GetTierConfigurationsHandler::new(Arc::new(InMemoryTierConfigurationRepository::new()));
        let rows = handler
            .handle(GetTierConfigurationsQuery {
                region: "  ".to_string(),
            })
            .await
            .unwrap();
        assert!(rows.is_empty());
    }
}
