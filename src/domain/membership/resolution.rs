//! Level-to-price resolution over a single configuration.
//!
//! Level numbers are 1-based for paying configurations. Level 0 is the
//! indigent sentinel and only resolves against a non-paying configuration.
//! For Mixed configurations the paying levels form one linear space: urban
//! levels first, then rural levels as a second contiguous block.

use serde::{Deserialize, Serialize};

use super::area::AreaClassification;
use super::configuration::TierConfiguration;
use super::levels::LevelsSpec;

/// Level number reserved for the free tier.
pub const INDIGENT_LEVEL: i64 = 0;

/// A resolved price and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPayment {
    /// Level number as requested by the caller.
    pub level_number: i64,

    /// Price for the level.
    pub amount: f64,

    /// Urban or Rural for Mixed sub-ranges, otherwise the configuration's own
    /// classification.
    pub classification: AreaClassification,

    /// 1-based position inside the sub-range; 0 for the indigent tier.
    pub sub_level: i64,

    pub is_indigent: bool,
}

impl TierConfiguration {
    /// Resolves a level number against this configuration.
    ///
    /// Returns `None` for any level this configuration does not price,
    /// including level 0 on paying configurations and any non-zero level on
    /// indigent ones.
    pub fn resolve_level(&self, level_number: i64) -> Option<ResolvedPayment> {
        if !self.is_paying {
            if level_number != INDIGENT_LEVEL {
                return None;
            }
            return self.payment_at(0).map(|amount| ResolvedPayment {
                level_number,
                amount,
                classification: self.classification,
                sub_level: 0,
                is_indigent: true,
            });
        }

        if level_number < 1 {
            return None;
        }

        let (classification, sub_level, block_start) = match self.levels {
            LevelsSpec::Split { urban, .. } if level_number <= urban => {
                (AreaClassification::Urban, level_number, 0)
            }
            LevelsSpec::Split { urban, rural } => {
                let sub_level = level_number - urban;
                if sub_level > rural {
                    return None;
                }
                (AreaClassification::Rural, sub_level, urban)
            }
            LevelsSpec::Flat(_) => (self.classification, level_number, 0),
        };

        let index = usize::try_from(block_start + sub_level - 1).ok()?;
        self.payment_at(index).map(|amount| ResolvedPayment {
            level_number,
            amount,
            classification,
            sub_level,
            is_indigent: false,
        })
    }

    /// Every level this configuration prices, in level-number order.
    pub fn price_schedule(&self) -> Vec<ResolvedPayment> {
        if !self.is_paying {
            return self.resolve_level(INDIGENT_LEVEL).into_iter().collect();
        }
        let total = self.payments.len() as i64;
        (1..=total)
            .filter_map(|level| self.resolve_level(level))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rural() -> TierConfiguration {
        TierConfiguration::new(
            "Test Region",
            AreaClassification::Rural,
            LevelsSpec::Flat(3),
            vec![50.0, 75.0, 100.0],
            true,
        )
    }

    fn gondar() -> TierConfiguration {
        TierConfiguration::new(
            "Gondar",
            AreaClassification::Mixed,
            LevelsSpec::Split { urban: 2, rural: 3 },
            vec![50.0, 100.0, 30.0, 60.0, 90.0],
            true,
        )
    }

    fn amount(config: &TierConfiguration, level: i64) -> Option<f64> {
        config.resolve_level(level).map(|r| r.amount)
    }

    #[test]
    fn flat_levels_are_one_based() {
        let config = rural();
        assert_eq!(amount(&config, 1), Some(50.0));
        assert_eq!(amount(&config, 2), Some(75.0));
        assert_eq!(amount(&config, 3), Some(100.0));
        assert_eq!(amount(&config, 4), None);
    }

    #[test]
    fn paying_configuration_does_not_price_level_zero() {
        assert_eq!(amount(&rural(), 0), None);
        assert_eq!(amount(&rural(), -1), None);
    }

    #[test]
    fn indigent_prices_only_level_zero() {
        let indigent = rural().indigent_sibling();
        let resolved = indigent.resolve_level(0).unwrap();
        assert_eq!(resolved.amount, 0.0);
        assert!(resolved.is_indigent);
        assert_eq!(resolved.sub_level, 0);
        assert_eq!(indigent.resolve_level(1), None);
    }

    #[test]
    fn mixed_walks_urban_then_rural_block() {
        let config = gondar();
        let amounts: Vec<_> = (1..=6).map(|level| amount(&config, level)).collect();
        assert_eq!(
            amounts,
            vec![Some(50.0), Some(100.0), Some(30.0), Some(60.0), Some(90.0), None]
        );
    }

    #[test]
    fn mixed_last_urban_level_stays_urban() {
        let resolved = gondar().resolve_level(2).unwrap();
        assert_eq!(resolved.classification, AreaClassification::Urban);
        assert_eq!(resolved.sub_level, 2);
        assert_eq!(resolved.amount, 100.0);
    }

    #[test]
    fn mixed_first_rural_level_rebases_to_one() {
        let resolved = gondar().resolve_level(3).unwrap();
        assert_eq!(resolved.classification, AreaClassification::Rural);
        assert_eq!(resolved.sub_level, 1);
        assert_eq!(resolved.amount, 30.0);
    }

    #[test]
    fn mixed_without_urban_levels_starts_rural() {
        let config = TierConfiguration::new(
            "Bahir Dar",
            AreaClassification::Mixed,
            LevelsSpec::Split { urban: 0, rural: 2 },
            vec![30.0, 60.0],
            true,
        );
        let resolved = config.resolve_level(1).unwrap();
        assert_eq!(resolved.classification, AreaClassification::Rural);
        assert_eq!(resolved.amount, 30.0);
        assert_eq!(amount(&config, 3), None);
    }

    #[test]
    fn flat_resolution_keeps_own_classification() {
        let resolved = rural().resolve_level(1).unwrap();
        assert_eq!(resolved.classification, AreaClassification::Rural);
        assert!(!resolved.is_indigent);
    }

    #[test]
    fn schedule_lists_every_level_in_order() {
        let schedule = gondar().price_schedule();
        let levels: Vec<_> = schedule.iter().map(|r| r.level_number).collect();
        assert_eq!(levels, vec![1, 2, 3, 4, 5]);
        assert_eq!(schedule[2].classification, AreaClassification::Rural);
    }

    #[test]
    fn indigent_schedule_is_single_level_zero() {
        let schedule = gondar().indigent_sibling().price_schedule();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].level_number, 0);
        assert_eq!(schedule[0].amount, 0.0);
    }

    proptest! {
        #[test]
        fn mixed_resolution_matches_linear_index(
            urban in 0i64..6,
            rural_levels in 1i64..6,
            level in -2i64..15,
        ) {
            let total = urban + rural_levels;
            let payments: Vec<f64> = (0..total).map(|i| (i as f64) * 10.0 + 1.0).collect();
            let config = TierConfiguration::new(
                "P",
                AreaClassification::Mixed,
                LevelsSpec::Split { urban, rural: rural_levels },
                payments.clone(),
                true,
            );
            let expected = if level >= 1 && level <= total {
                Some(payments[(level - 1) as usize])
            } else {
                None
            };
            prop_assert_eq!(config.resolve_level(level).map(|r| r.amount), expected);
        }

        #[test]
        fn schedule_covers_every_declared_level(levels in 1i64..12) {
            let config = TierConfiguration::new(
                "P",
                AreaClassification::Urban,
                LevelsSpec::Flat(levels),
                vec![5.0; levels as usize],
                true,
            );
            prop_assert_eq!(config.price_schedule().len(), levels as usize);
        }
    }
}
