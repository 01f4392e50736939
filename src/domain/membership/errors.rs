//! Tier-specific error types.
//!
//! Validation failures raised while creating or updating a tier
//! configuration, and the module-level error surfaced by tier operations.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | NotConfigured | 404 |
//! | AlreadyExists | 409 |
//! | Configuration | 500 |
//! | Store | 500 |

use thiserror::Error;

use super::area::AreaClassification;
use super::configuration::TierKey;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Reasons a tier configuration is rejected before persistence.
///
/// Rules are checked in a fixed order and the first failure is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierValidationError {
    #[error("Region must not be blank")]
    EmptyRegion,

    #[error("Invalid levels for {classification} area: {reason}")]
    InvalidLevelsSpec {
        classification: AreaClassification,
        reason: String,
    },

    #[error("Payments must have {expected} entries to match the declared levels, got {actual}")]
    PaymentsLengthMismatch { expected: usize, actual: usize },

    #[error("Payment at position {index} must be a non-negative number, got {amount}")]
    NegativePayment { index: usize, amount: f64 },

    #[error("Indigent payment at position {index} must be 0, got {amount}")]
    IndigentPayment { index: usize, amount: f64 },
}

impl TierValidationError {
    pub fn invalid_levels(classification: AreaClassification, reason: impl Into<String>) -> Self {
        TierValidationError::InvalidLevelsSpec {
            classification,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            TierValidationError::EmptyRegion => ErrorCode::EmptyField,
            TierValidationError::InvalidLevelsSpec { .. } => ErrorCode::InvalidLevelsSpec,
            TierValidationError::PaymentsLengthMismatch { .. } => {
                ErrorCode::PaymentsLengthMismatch
            }
            TierValidationError::NegativePayment { .. } => ErrorCode::NegativePayment,
            TierValidationError::IndigentPayment { .. } => ErrorCode::IndigentPaymentNotFree,
        }
    }
}

/// Errors surfaced by tier configuration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TierError {
    /// The submitted configuration failed validation.
    Validation(TierValidationError),

    /// No configuration prices the requested level.
    NotConfigured {
        region: String,
        classification: AreaClassification,
        level_number: i64,
    },

    /// A configuration with this key already exists.
    AlreadyExists(TierKey),

    /// An internally-built configuration broke its own invariants.
    Configuration(String),

    /// The configuration store failed.
    Store(String),
}

impl TierError {
    pub fn not_configured(
        region: impl Into<String>,
        classification: AreaClassification,
        level_number: i64,
    ) -> Self {
        TierError::NotConfigured {
            region: region.into(),
            classification,
            level_number,
        }
    }

    pub fn already_exists(key: TierKey) -> Self {
        TierError::AlreadyExists(key)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        TierError::Configuration(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        TierError::Store(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TierError::Validation(err) => err.code(),
            TierError::NotConfigured { .. } => ErrorCode::TierNotConfigured,
            TierError::AlreadyExists(_) => ErrorCode::TierConfigurationExists,
            TierError::Configuration(_) => ErrorCode::ConfigurationInvariant,
            TierError::Store(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            TierError::Validation(err) => err.to_string(),
            TierError::NotConfigured {
                region,
                classification,
                level_number,
            } => format!(
                "No payment configured for level {} in {} ({})",
                level_number, region, classification
            ),
            TierError::AlreadyExists(key) => {
                format!("Tier configuration already exists for {}", key)
            }
            TierError::Configuration(msg) => format!("Tier configuration invariant broken: {}", msg),
            TierError::Store(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TierError::Store(_))
    }
}

impl std::fmt::Display for TierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TierError {}

impl From<TierValidationError> for TierError {
    fn from(err: TierValidationError) -> Self {
        TierError::Validation(err)
    }
}

impl From<DomainError> for TierError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ConfigurationInvariant => TierError::Configuration(err.message),
            _ => TierError::Store(err.to_string()),
        }
    }
}

impl From<TierError> for DomainError {
    fn from(err: TierError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
