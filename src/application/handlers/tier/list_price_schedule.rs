//! ListPriceScheduleHandler - Query handler listing every price of a region and classification.
//!
//! Keeps the zero-priced indigent tier apart from the paying levels so
//! callers can tell "free" from "not configured".

use std::sync::Arc;

use crate::domain::membership::{AreaClassification, ResolvedPayment, TierError, TierKey};
use crate::ports::TierConfigurationReader;

/// Query for the full schedule of one region and classification.
#[derive(Debug, Clone)]
pub struct ListPriceScheduleQuery {
    pub region: String,
    pub classification: AreaClassification,
}

/// All priced levels for a region and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSchedule {
    pub region: String,
    pub classification: AreaClassification,
    /// Level 0, when an indigent row exists.
    pub indigent: Option<ResolvedPayment>,
    /// Paying levels in level-number order; empty when no paying row exists.
    pub levels: Vec<ResolvedPayment>,
}

impl PriceSchedule {
    /// True when neither a paying nor an indigent row is configured.
    pub fn is_empty(&self) -> bool {
        self.indigent.is_none() && self.levels.is_empty()
    }
}

pub struct ListPriceScheduleHandler {
    reader: Arc<dyn TierConfigurationReader>,
}

impl ListPriceScheduleHandler {
    pub fn new(reader: Arc<dyn TierConfigurationReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(&self, query: ListPriceScheduleQuery) -> Result<PriceSchedule, TierError> {
        let paying_key = TierKey::new(&query.region, query.classification, true);

        let levels = self
            .reader
            .find_by_key(&paying_key)
            .await?
            .map(|config| config.price_schedule())
            .unwrap_or_default();

        let indigent = self
            .reader
            .find_by_key(&paying_key.indigent())
            .await?
            .and_then(|config| config.price_schedule().into_iter().next());

        Ok(PriceSchedule {
            region: paying_key.region,
            classification: query.classification,
            indigent,
            levels,
        })
    }
}
