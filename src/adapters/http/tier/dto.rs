//! HTTP DTOs (Data Transfer Objects) for tier endpoints.
//!
//! These types define the JSON request/response structure for the tier API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::tier::{PriceSchedule, SaveOutcome, SaveTierConfigurationResult};
use crate::domain::membership::{LevelsSpec, ResolvedPayment, TierConfiguration};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create or update a tier configuration.
///
/// `levels` and `payments` are kept loosely typed so that a wrong shape or a
/// non-numeric amount is reported by validation rather than as a JSON parse
/// failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveTierConfigurationRequest {
    pub region: String,
    pub classification: String,
    pub levels: serde_json::Value,
    pub payments: Vec<serde_json::Value>,
    #[serde(default = "default_is_paying")]
    pub is_paying: bool,
}

impl SaveTierConfigurationRequest {
    /// Payments as amounts. Non-numeric entries become NaN, which validation
    /// rejects as an invalid payment at that position.
    pub fn payment_amounts(&self) -> Vec<f64> {
        self.payments
            .iter()
            .map(|value| value.as_f64().unwrap_or(f64::NAN))
            .collect()
    }
}

fn default_is_paying() -> bool {
    true
}

/// Query string for listing a region's configurations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListTiersParams {
    pub region: String,
}

/// Query string for resolving a level's payment.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvePaymentParams {
    pub region: String,
    pub classification: String,
    pub level: i64,
}

/// Query string for a price schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleParams {
    pub region: String,
    pub classification: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A stored tier configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TierConfigurationResponse {
    pub id: String,
    pub region: String,
    pub classification: String,
    pub levels: LevelsSpec,
    pub payments: Vec<f64>,
    pub is_paying: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TierConfiguration> for TierConfigurationResponse {
    fn from(config: TierConfiguration) -> Self {
        Self {
            id: config.id.to_string(),
            region: config.region,
            classification: config.classification.as_str().to_string(),
            levels: config.levels,
            payments: config.payments,
            is_paying: config.is_paying,
            created_at: config.created_at.to_rfc3339(),
            updated_at: config.updated_at.to_rfc3339(),
        }
    }
}

/// Response for a create-or-update call.
#[derive(Debug, Clone, Serialize)]
pub struct SaveTierConfigurationResponse {
    pub configuration: TierConfigurationResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indigent: Option<TierConfigurationResponse>,
    pub created: bool,
    pub indigent_created: bool,
}

impl From<SaveTierConfigurationResult> for SaveTierConfigurationResponse {
    fn from(result: SaveTierConfigurationResult) -> Self {
        let (created, indigent_created) = match result.outcome {
            SaveOutcome::Created {
                indigent_sibling_created,
            } => (true, indigent_sibling_created),
            SaveOutcome::Updated => (false, false),
        };
        Self {
            configuration: result.configuration.into(),
            indigent: result.indigent_sibling.map(Into::into),
            created,
            indigent_created,
        }
    }
}

/// Response for a region listing.
#[derive(Debug, Clone, Serialize)]
pub struct TierConfigurationListResponse {
    pub region: String,
    pub configurations: Vec<TierConfigurationResponse>,
}

/// One priced level.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub level: i64,
    pub amount: f64,
    pub classification: String,
    pub sub_level: i64,
    pub is_indigent: bool,
}

impl From<ResolvedPayment> for PaymentResponse {
    fn from(payment: ResolvedPayment) -> Self {
        Self {
            level: payment.level_number,
            amount: payment.amount,
            classification: payment.classification.as_str().to_string(),
            sub_level: payment.sub_level,
            is_indigent: payment.is_indigent,
        }
    }
}

/// Every priced level of a region and classification.
#[derive(Debug, Clone, Serialize)]
pub struct PriceScheduleResponse {
    pub region: String,
    pub classification: String,
    pub indigent: Option<PaymentResponse>,
    pub levels: Vec<PaymentResponse>,
}

impl From<PriceSchedule> for PriceScheduleResponse {
    fn from(schedule: PriceSchedule) -> Self {
        Self {
            region: schedule.region,
            classification: schedule.classification.as_str().to_string(),
            indigent: schedule.indigent.map(Into::into),
            levels: schedule.levels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::membership::AreaClassification;
    use serde_json::json;

    #[test]
    fn save_request_defaults_to_paying() {
        let json = r#"{
            "region": "Gondar",
            "classification": "Mixed",
            "levels": {"urban": 2, "rural": 3},
            "payments": [50, 100, 30, 60, 90]
        }"#;
        let request: SaveTierConfigurationRequest = serde_json::from_str(json).unwrap();
        assert!(request.is_paying);
        assert_eq!(request.levels, json!({"urban": 2, "rural": 3}));
        assert_eq!(request.payment_amounts(), vec![50.0, 100.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn save_request_keeps_non_numeric_payments_for_validation() {
        let json = r#"{
            "region": "Gondar",
            "classification": "Rural",
            "levels": 2,
            "payments": [10, "abc"]
        }"#;
        let request: SaveTierConfigurationRequest = serde_json::from_str(json).unwrap();
        let amounts = request.payment_amounts();
        assert_eq!(amounts[0], 10.0);
        assert!(amounts[1].is_nan());
    }

    #[test]
    fn save_request_accepts_explicit_indigent_flag() {
        let json = r#"{
            "region": "Gondar",
            "classification": "Rural",
            "levels": 1,
            "payments": [0],
            "is_paying": false
        }"#;
        let request: SaveTierConfigurationRequest = serde_json::from_str(json).unwrap();
        assert!(!request.is_paying);
    }

    #[test]
    fn configuration_response_keeps_levels_wire_form() {
        let config = TierConfiguration::new(
            "Gondar",
            AreaClassification::Mixed,
            LevelsSpec::Split { urban: 2, rural: 3 },
            vec![50.0, 100.0, 30.0, 60.0, 90.0],
            true,
        );
        let value = serde_json::to_value(TierConfigurationResponse::from(config)).unwrap();

        assert_eq!(value["classification"], "Mixed");
        assert_eq!(value["levels"], json!({"urban": 2, "rural": 3}));
        assert_eq!(value["is_paying"], true);
    }

    #[test]
    fn save_response_reports_outcome_flags() {
        let config = TierConfiguration::new(
            "Test Region",
            AreaClassification::Urban,
            LevelsSpec::Flat(1),
            vec![100.0],
            true,
        );
        let sibling = config.indigent_sibling();
        let response = SaveTierConfigurationResponse::from(SaveTierConfigurationResult {
            configuration: config,
            indigent_sibling: Some(sibling),
            outcome: SaveOutcome::Created {
                indigent_sibling_created: true,
            },
        });

        assert!(response.created);
        assert!(response.indigent_created);
        assert_eq!(response.indigent.unwrap().payments, vec![0.0]);
    }

    #[test]
    fn error_response_omits_missing_details() {
        let value = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "gone")).unwrap();
        assert_eq!(value, json!({"code": "NOT_FOUND", "message": "gone"}));
    }
}
