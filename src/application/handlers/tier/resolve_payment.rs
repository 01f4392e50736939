//! TierResolver - Query handler resolving a level number to a price.
//!
//! Stateless: every call is a keyed read against the configuration store.
//! Absence of a configuration or of the level is `Ok(None)`; only store
//! failures are errors.

use std::sync::Arc;

use tracing::debug;

use crate::domain::membership::{
    AreaClassification, ResolvedPayment, TierError, TierKey, INDIGENT_LEVEL,
};
use crate::ports::TierConfigurationReader;

/// Query for the price of one level.
#[derive(Debug, Clone)]
pub struct ResolvePaymentQuery {
    pub region: String,
    pub classification: AreaClassification,
    /// 1-based paying level, or 0 for the indigent tier.
    pub level_number: i64,
}

/// Resolves prices from stored tier configurations.
#[derive(Clone)]
pub struct TierResolver {
    reader: Arc<dyn TierConfigurationReader>,
}

impl TierResolver {
    pub fn new(reader: Arc<dyn TierConfigurationReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ResolvePaymentQuery,
    ) -> Result<Option<ResolvedPayment>, TierError> {
        self.resolve(&query.region, query.classification, query.level_number)
            .await
    }

    /// Price of a level, or `None` when it is not configured.
    pub async fn resolve_payment(
        &self,
        region: &str,
        classification: AreaClassification,
        level_number: i64,
    ) -> Result<Option<f64>, TierError> {
        Ok(self
            .resolve(region, classification, level_number)
            .await?
            .map(|resolved| resolved.amount))
    }

    /// Resolves a level along with the sub-range it fell into.
    ///
    /// Level 0 always reads the indigent row of the pair. Paying levels read
    /// the paying row; for Mixed regions that row's urban count decides
    /// whether the level lands in the urban block or, rebased by that count,
    /// in the rural block. Separate Urban and Rural rows of the region are
    /// never consulted for a Mixed query.
    pub async fn resolve(
        &self,
        region: &str,
        classification: AreaClassification,
        level_number: i64,
    ) -> Result<Option<ResolvedPayment>, TierError> {
        if level_number < INDIGENT_LEVEL {
            debug!(region, %classification, level_number, "Negative level requested");
            return Ok(None);
        }

        let is_paying = level_number != INDIGENT_LEVEL;
        let key = TierKey::new(region, classification, is_paying);

        let Some(configuration) = self.reader.find_by_key(&key).await? else {
            debug!(key = %key, level_number, "No tier configuration for key");
            return Ok(None);
        };

        let resolved = configuration.resolve_level(level_number);
        match &resolved {
            Some(payment) => debug!(
                key = %key,
                level_number,
                amount = payment.amount,
                sub_range = %payment.classification,
                sub_level = payment.sub_level,
                "Resolved tier payment"
            ),
            None => debug!(key = %key, level_number, "Level outside configured range"),
        }
        Ok(resolved)
    }
}
