//! HTTP handlers for tier endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use crate::application::handlers::tier::{
    GetTierConfigurationsHandler, GetTierConfigurationsQuery, ListPriceScheduleHandler,
    ListPriceScheduleQuery, ResolvePaymentQuery, SaveOutcome, SaveTierConfigurationCommand,
    SaveTierConfigurationHandler, TierResolver,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::membership::{
    AreaClassification, LevelsSpec, TierError, TierValidationError, UnknownClassification,
};
use crate::ports::{TierConfigurationReader, TierConfigurationRepository};

use super::dto::{
    ErrorResponse, ListTiersParams, PaymentResponse, PriceScheduleResponse, ResolvePaymentParams,
    SaveTierConfigurationRequest, SaveTierConfigurationResponse, ScheduleParams,
    TierConfigurationListResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for tier endpoints.
///
/// Both ports are usually served by the same adapter instance.
#[derive(Clone)]
pub struct TierAppState {
    pub repository: Arc<dyn TierConfigurationRepository>,
    pub reader: Arc<dyn TierConfigurationReader>,
}

impl TierAppState {
    /// Builds state from one adapter implementing both ports.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: TierConfigurationRepository + TierConfigurationReader + 'static,
    {
        Self {
            repository: store.clone(),
            reader: store,
        }
    }

    pub fn save_handler(&self) -> SaveTierConfigurationHandler {
        SaveTierConfigurationHandler::new(self.repository.clone())
    }

    pub fn resolver(&self) -> TierResolver {
        TierResolver::new(self.reader.clone())
    }

    pub fn schedule_handler(&self) -> ListPriceScheduleHandler {
        ListPriceScheduleHandler::new(self.reader.clone())
    }

    pub fn list_handler(&self) -> GetTierConfigurationsHandler {
        GetTierConfigurationsHandler::new(self.reader.clone())
    }
}

fn parse_classification(raw: &str) -> Result<AreaClassification, TierApiError> {
    raw.parse().map_err(|e: UnknownClassification| {
        TierApiError::invalid_input("classification", e.to_string())
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/tiers?region= - List every configuration of a region
pub async fn list_tier_configurations(
    State(state): State<TierAppState>,
    Query(params): Query<ListTiersParams>,
) -> Result<impl IntoResponse, TierApiError> {
    let handler = state.list_handler();
    let configurations = handler
        .handle(GetTierConfigurationsQuery {
            region: params.region.clone(),
        })
        .await?;

    Ok(Json(TierConfigurationListResponse {
        region: params.region.trim().to_string(),
        configurations: configurations.into_iter().map(Into::into).collect(),
    }))
}

/// GET /api/tiers/payment?region=&classification=&level= - Resolve a level's payment
pub async fn resolve_payment(
    State(state): State<TierAppState>,
    Query(params): Query<ResolvePaymentParams>,
) -> Result<impl IntoResponse, TierApiError> {
    let classification = parse_classification(&params.classification)?;
    let resolver = state.resolver();

    let resolved = resolver
        .handle(ResolvePaymentQuery {
            region: params.region.clone(),
            classification,
            level_number: params.level,
        })
        .await?
        .ok_or_else(|| {
            TierError::not_configured(params.region.trim(), classification, params.level)
        })?;

    Ok(Json(PaymentResponse::from(resolved)))
}

/// GET /api/tiers/schedule?region=&classification= - List a price schedule
pub async fn get_price_schedule(
    State(state): State<TierAppState>,
    Query(params): Query<ScheduleParams>,
) -> Result<impl IntoResponse, TierApiError> {
    let classification = parse_classification(&params.classification)?;
    let handler = state.schedule_handler();

    let schedule = handler
        .handle(ListPriceScheduleQuery {
            region: params.region,
            classification,
        })
        .await?;

    Ok(Json(PriceScheduleResponse::from(schedule)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/tiers - Create or update a tier configuration
///
/// Responds 201 when the row was created and 200 when it was updated.
pub async fn save_tier_configuration(
    State(state): State<TierAppState>,
    Json(request): Json<SaveTierConfigurationRequest>,
) -> Result<impl IntoResponse, TierApiError> {
    let classification = parse_classification(&request.classification)?;
    let levels = LevelsSpec::from_json(classification, &request.levels).map_err(TierError::from)?;
    let payments = request.payment_amounts();

    let handler = state.save_handler();
    let cmd = SaveTierConfigurationCommand {
        region: request.region,
        classification,
        levels,
        payments,
        is_paying: request.is_paying,
    };

    let result = handler.handle(cmd).await?;

    let status = match result.outcome {
        SaveOutcome::Created { .. } => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };

    Ok((status, Json(SaveTierConfigurationResponse::from(result))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts tier errors to HTTP responses.
#[derive(Debug)]
pub enum TierApiError {
    /// A request field could not be interpreted.
    InvalidInput { field: &'static str, message: String },
    Tier(TierError),
}

impl TierApiError {
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        TierApiError::InvalidInput {
            field,
            message: message.into(),
        }
    }
}

impl From<TierError> for TierApiError {
    fn from(err: TierError) -> Self {
        TierApiError::Tier(err)
    }
}

fn validation_details(err: &TierValidationError) -> serde_json::Value {
    match err {
        TierValidationError::EmptyRegion => json!({"field": "region"}),
        TierValidationError::InvalidLevelsSpec { classification, .. } => {
            json!({"field": "levels", "classification": classification.as_str()})
        }
        TierValidationError::PaymentsLengthMismatch { expected, actual } => {
            json!({"field": "payments", "expected": expected, "actual": actual})
        }
        TierValidationError::NegativePayment { index, .. }
        | TierValidationError::IndigentPayment { index, .. } => {
            json!({"field": "payments", "index": index})
        }
    }
}

impl IntoResponse for TierApiError {
    fn into_response(self) -> axum::response::Response {
        let err = match self {
            TierApiError::InvalidInput { field, message } => {
                let body = ErrorResponse::with_details(
                    ErrorCode::ValidationFailed.to_string(),
                    message,
                    json!({ "field": field }),
                );
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            TierApiError::Tier(err) => err,
        };

        let status = match &err {
            TierError::Validation(_) => StatusCode::BAD_REQUEST,
            TierError::NotConfigured { .. } => StatusCode::NOT_FOUND,
            TierError::AlreadyExists(_) => StatusCode::CONFLICT,
            TierError::Configuration(_) | TierError::Store(_) => {
                error!(code = %err.code(), error = %err, "Tier request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &err {
            TierError::Validation(validation) => ErrorResponse::with_details(
                err.code().to_string(),
                err.message(),
                validation_details(validation),
            ),
            TierError::Configuration(_) | TierError::Store(_) => {
                ErrorResponse::new(err.code().to_string(), "An internal error occurred")
            }
            _ => ErrorResponse::new(err.code().to_string(), err.message()),
        };

        (status, Json(body)).into_response()
    }
}
