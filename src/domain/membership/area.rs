//! Area classification of a region.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of area a tier configuration applies to.
///
/// `Mixed` regions split their paying levels into an urban sub-range
/// followed by a rural sub-range that share one level-number space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AreaClassification {
    Rural,
    Urban,
    Mixed,
}

impl AreaClassification {
    pub const ALL: [AreaClassification; 3] = [
        AreaClassification::Rural,
        AreaClassification::Urban,
        AreaClassification::Mixed,
    ];

    /// Returns the stored/wire name for this classification.
    pub fn as_str(&self) -> &'static str {
        match self {
            AreaClassification::Rural => "Rural",
            AreaClassification::Urban => "Urban",
            AreaClassification::Mixed => "Mixed",
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, AreaClassification::Mixed)
    }
}

impl std::fmt::Display for AreaClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string names no known classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown area classification: {0}")]
pub struct UnknownClassification(pub String);

impl FromStr for AreaClassification {
    type Err = UnknownClassification;

    /// Accepts the stored names case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rural" => Ok(AreaClassification::Rural),
            "urban" => Ok(AreaClassification::Urban),
            "mixed" => Ok(AreaClassification::Mixed),
            _ => Err(UnknownClassification(s.to_string())),
        }
    }
}
