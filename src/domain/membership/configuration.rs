//! Tier configuration entity.
//!
//! A `TierConfiguration` declares, for one region and one area
//! classification, how many levels exist and what each level costs.
//!
//! # Invariants
//!
//! - `(region, classification, is_paying)` is unique across the store
//! - the number of payments equals the declared level count
//! - every payment is a non-negative number
//! - every paying configuration has an indigent sibling with a single
//!   zero payment (provisioned by the save handler, not by this type)

use serde::{Deserialize, Serialize};
use std::fmt;

use super::area::AreaClassification;
use super::errors::TierValidationError;
use super::levels::LevelsSpec;
use crate::domain::foundation::{TierConfigurationId, Timestamp};

/// Composite unique key of a tier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TierKey {
    pub region: String,
    pub classification: AreaClassification,
    pub is_paying: bool,
}

impl TierKey {
    /// Creates a key; the region is trimmed the same way stored rows are.
    pub fn new(region: impl AsRef<str>, classification: AreaClassification, is_paying: bool) -> Self {
        Self {
            region: region.as_ref().trim().to_string(),
            classification,
            is_paying,
        }
    }

    /// Key of the indigent counterpart for the same region and classification.
    pub fn indigent(&self) -> Self {
        Self {
            region: self.region.clone(),
            classification: self.classification,
            is_paying: false,
        }
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({})",
            self.region,
            self.classification,
            if self.is_paying { "Paying" } else { "Indigent" }
        )
    }
}

/// Pricing declaration for one region and area classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfiguration {
    pub id: TierConfigurationId,
    pub region: String,
    pub classification: AreaClassification,
    pub levels: LevelsSpec,
    pub payments: Vec<f64>,
    pub is_paying: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TierConfiguration {
    /// Builds an unvalidated configuration with a fresh id.
    ///
    /// Call [`TierConfiguration::validate`] before persisting.
    pub fn new(
        region: impl AsRef<str>,
        classification: AreaClassification,
        levels: LevelsSpec,
        payments: Vec<f64>,
        is_paying: bool,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: TierConfigurationId::new(),
            region: region.as_ref().trim().to_string(),
            classification,
            levels,
            payments,
            is_paying,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> TierKey {
        TierKey {
            region: self.region.clone(),
            classification: self.classification,
            is_paying: self.is_paying,
        }
    }

    /// Builds the free configuration paired with this one.
    ///
    /// The sibling is always a flat single level priced at zero, also for
    /// Mixed regions.
    pub fn indigent_sibling(&self) -> TierConfiguration {
        TierConfiguration::new(
            &self.region,
            self.classification,
            LevelsSpec::INDIGENT,
            vec![0.0],
            false,
        )
    }

    /// Returns a copy carrying new levels and payments, keeping identity.
    pub fn revise(&self, levels: LevelsSpec, payments: Vec<f64>) -> TierConfiguration {
        TierConfiguration {
            levels,
            payments,
            updated_at: Timestamp::now(),
            ..self.clone()
        }
    }

    /// Checks every configuration rule, reporting the first failure.
    pub fn validate(&self) -> Result<(), TierValidationError> {
        if self.region.trim().is_empty() {
            return Err(TierValidationError::EmptyRegion);
        }
        validate_levels(self.classification, self.is_paying, &self.levels, &self.payments)
    }

    /// Payment stored at a 0-based position.
    pub fn payment_at(&self, index: usize) -> Option<f64> {
        self.payments.get(index).copied()
    }
}

impl fmt::Display for TierConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Validates a levels declaration and its payments.
///
/// Rules, in order:
/// 1. Indigent rows declare exactly one level; paying Rural/Urban rows need a
///    positive level count.
/// 2. Paying Mixed rows need non-negative urban/rural counts summing to at least one.
/// 3. The payment count equals the derived level count.
/// 4. Every payment is a finite, non-negative number.
/// 5. An indigent row's single payment is zero.
pub fn validate_levels(
    classification: AreaClassification,
    is_paying: bool,
    levels: &LevelsSpec,
    payments: &[f64],
) -> Result<(), TierValidationError> {
    let expected = expected_level_count(classification, is_paying, levels)?;

    if payments.len() != expected {
        return Err(TierValidationError::PaymentsLengthMismatch {
            expected,
            actual: payments.len(),
        });
    }

    if let Some((index, amount)) = payments
        .iter()
        .enumerate()
        .find(|(_, amount)| !amount.is_finite() || **amount < 0.0)
    {
        return Err(TierValidationError::NegativePayment {
            index,
            amount: *amount,
        });
    }

    if let Some((index, amount)) = payments
        .iter()
        .enumerate()
        .find(|(_, amount)| !is_paying && **amount != 0.0)
    {
        return Err(TierValidationError::IndigentPayment {
            index,
            amount: *amount,
        });
    }

    Ok(())
}

fn expected_level_count(
    classification: AreaClassification,
    is_paying: bool,
    levels: &LevelsSpec,
) -> Result<usize, TierValidationError> {
    if !is_paying {
        return match *levels {
            LevelsSpec::INDIGENT => Ok(1),
            other => Err(TierValidationError::invalid_levels(
                classification,
                format!("an indigent tier has exactly one level, got {}", other),
            )),
        };
    }

    match (classification.is_mixed(), *levels) {
        (false, LevelsSpec::Flat(count)) if count >= 1 => usize::try_from(count).map_err(|_| {
            TierValidationError::invalid_levels(classification, "level count is too large")
        }),
        (false, LevelsSpec::Flat(count)) => Err(TierValidationError::invalid_levels(
            classification,
            format!("level count must be a positive integer, got {}", count),
        )),
        (false, LevelsSpec::Split { .. }) => Err(TierValidationError::invalid_levels(
            classification,
            "expected a level count, got an urban/rural split",
        )),
        (true, LevelsSpec::Split { urban, rural }) if urban < 0 || rural < 0 => {
            Err(TierValidationError::invalid_levels(
                classification,
                format!(
                    "urban and rural levels must be non-negative, got urban={} rural={}",
                    urban, rural
                ),
            ))
        }
        (true, split @ LevelsSpec::Split { .. }) => match split.total_levels() {
            Some(total) if total >= 1 => Ok(total),
            Some(_) => Err(TierValidationError::invalid_levels(
                classification,
                "at least one urban or rural level is required",
            )),
            None => Err(TierValidationError::invalid_levels(
                classification,
                "level counts are too large",
            )),
        },
        (true, LevelsSpec::Flat(_)) => Err(TierValidationError::invalid_levels(
            classification,
            "expected an object with 'urban' and 'rural' level counts",
        )),
    }
}
