//! Error types for the domain layer.

use std::error::Error;
use std::fmt;

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    InvalidLevelsSpec,
    PaymentsLengthMismatch,
    NegativePayment,
    IndigentPaymentNotFree,

    // Not found errors
    NotFound,
    TierNotConfigured,

    // State errors
    TierConfigurationExists,
    ConfigurationInvariant,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::InvalidLevelsSpec => "INVALID_LEVELS_SPEC",
            ErrorCode::PaymentsLengthMismatch => "PAYMENTS_LENGTH_MISMATCH",
            ErrorCode::NegativePayment => "NEGATIVE_PAYMENT",
            ErrorCode::IndigentPaymentNotFree => "INDIGENT_PAYMENT_NOT_FREE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::TierNotConfigured => "TIER_NOT_CONFIGURED",
            ErrorCode::TierConfigurationExists => "TIER_CONFIGURATION_EXISTS",
            ErrorCode::ConfigurationInvariant => "CONFIGURATION_INVARIANT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code and message.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Returns true if this error reports a unique-key conflict.
    pub fn is_conflict(&self) -> bool {
        self.code == ErrorCode::TierConfigurationExists
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
