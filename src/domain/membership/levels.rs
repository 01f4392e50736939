//! Level declarations for a tier configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::area::AreaClassification;
use super::errors::TierValidationError;

/// How many levels a configuration declares.
///
/// Counts are signed so that out-of-range input survives parsing and is
/// rejected by validation with a meaningful error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LevelsSpec {
    /// Level count for Rural/Urban configurations. Stored as a bare integer.
    Flat(i64),

    /// Urban levels followed by rural levels, for Mixed configurations.
    /// Stored as `{"urban": n, "rural": m}`.
    Split { urban: i64, rural: i64 },
}

impl LevelsSpec {
    /// Shape used by every indigent configuration.
    pub const INDIGENT: LevelsSpec = LevelsSpec::Flat(1);

    /// Total number of levels declared, or `None` when the counts are
    /// negative or overflow.
    pub fn total_levels(&self) -> Option<usize> {
        match *self {
            LevelsSpec::Flat(count) => usize::try_from(count).ok(),
            LevelsSpec::Split { urban, rural } => {
                let urban = usize::try_from(urban).ok()?;
                let rural = usize::try_from(rural).ok()?;
                urban.checked_add(rural)
            }
        }
    }

    /// Length of the urban sub-range; zero for flat declarations.
    pub fn urban_levels(&self) -> i64 {
        match *self {
            LevelsSpec::Flat(_) => 0,
            LevelsSpec::Split { urban, .. } => urban,
        }
    }

    /// Parses a loosely-typed JSON declaration.
    ///
    /// Integers become `Flat`; objects carrying both `urban` and `rural`
    /// integer keys become `Split`. Anything else is an invalid levels spec
    /// for the given classification.
    pub fn from_json(
        classification: AreaClassification,
        value: &Value,
    ) -> Result<Self, TierValidationError> {
        match value {
            Value::Number(n) => n.as_i64().map(LevelsSpec::Flat).ok_or_else(|| {
                TierValidationError::invalid_levels(
                    classification,
                    format!("level count must be an integer, got {}", n),
                )
            }),
            Value::Object(map) => {
                let count = |key: &str| -> Result<i64, TierValidationError> {
                    map.get(key).and_then(Value::as_i64).ok_or_else(|| {
                        TierValidationError::invalid_levels(
                            classification,
                            format!("'{}' must be present and an integer", key),
                        )
                    })
                };
                Ok(LevelsSpec::Split {
                    urban: count("urban")?,
                    rural: count("rural")?,
                })
            }
            other => Err(TierValidationError::invalid_levels(
                classification,
                format!("expected an integer or an urban/rural object, got {}", other),
            )),
        }
    }
}

impl std::fmt::Display for LevelsSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelsSpec::Flat(count) => write!(f, "{}", count),
            LevelsSpec::Split { urban, rural } => write!(f, "urban={} rural={}", urban, rural),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_serializes_as_bare_integer() {
        assert_eq!(serde_json::to_value(LevelsSpec::Flat(3)).unwrap(), json!(3));
    }

    #[test]
    fn split_serializes_as_object() {
        let spec = LevelsSpec::Split { urban: 2, rural: 3 };
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            json!({"urban": 2, "rural": 3})
        );
    }

    #[test]
    fn deserializes_both_shapes() {
        let flat: LevelsSpec = serde_json::from_value(json!(4)).unwrap();
        let split: LevelsSpec = serde_json::from_value(json!({"urban": 1, "rural": 0})).unwrap();
        assert_eq!(flat, LevelsSpec::Flat(4));
        assert_eq!(split, LevelsSpec::Split { urban: 1, rural: 0 });
    }

    #[test]
    fn total_levels_sums_split() {
        assert_eq!(LevelsSpec::Split { urban: 2, rural: 3 }.total_levels(), Some(5));
        assert_eq!(LevelsSpec::Flat(3).total_levels(), Some(3));
    }

    #[test]
    fn total_levels_is_none_for_negative_counts() {
        assert_eq!(LevelsSpec::Flat(-1).total_levels(), None);
        assert_eq!(LevelsSpec::Split { urban: -1, rural: 4 }.total_levels(), None);
    }

    #[test]
    fn urban_levels_is_zero_for_flat() {
        assert_eq!(LevelsSpec::Flat(5).urban_levels(), 0);
        assert_eq!(LevelsSpec::Split { urban: 2, rural: 3 }.urban_levels(), 2);
    }

    #[test]
    fn from_json_accepts_integer() {
        let spec = LevelsSpec::from_json(AreaClassification::Rural, &json!(3)).unwrap();
        assert_eq!(spec, LevelsSpec::Flat(3));
    }

    #[test]
    fn from_json_accepts_split_object() {
        let spec =
            LevelsSpec::from_json(AreaClassification::Mixed, &json!({"urban": 2, "rural": 3}))
                .unwrap();
        assert_eq!(spec, LevelsSpec::Split { urban: 2, rural: 3 });
    }

    #[test]
    fn from_json_rejects_fractional_count() {
        let err = LevelsSpec::from_json(AreaClassification::Urban, &json!(2.5)).unwrap_err();
        assert!(matches!(err, TierValidationError::InvalidLevelsSpec { .. }));
    }

    #[test]
    fn from_json_rejects_missing_rural_key() {
        let err =
            LevelsSpec::from_json(AreaClassification::Mixed, &json!({"urban": 2})).unwrap_err();
        assert!(err.to_string().contains("rural"));
    }

    #[test]
    fn from_json_rejects_strings() {
        let err = LevelsSpec::from_json(AreaClassification::Rural, &json!("3")).unwrap_err();
        assert!(matches!(
            err,
            TierValidationError::InvalidLevelsSpec { classification: AreaClassification::Rural, .. }
        ));
    }
}
