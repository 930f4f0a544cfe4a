//! Transfer API Layer
//!
//! HTTP handlers for the ledger. Input is checked here first, then again by
//! the engine and the schema.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::engine::{MAX_SUM_SCALE, fits_store_scale};
use super::error::TransferError;
use super::types::CensoredView;
use crate::account::Account;
use crate::core_types::{AccountId, TransferId};
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, created, ok};

/// Upper bound on one history page
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Body of `POST /api/v1/transfers`
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    #[validate(range(min = 1, message = "Invalid recipient ID"))]
    pub recipient_id: AccountId,
    /// Accepts a JSON number or a decimal string
    #[validate(custom(function = "validate_positive_sum"))]
    pub sum: Decimal,
}

fn validate_positive_sum(sum: &Decimal) -> Result<(), ValidationError> {
    if *sum <= Decimal::ZERO {
        return Err(ValidationError::new("sum").with_message("Incorrect sum".into()));
    }
    if !fits_store_scale(*sum) {
        return Err(ValidationError::new("sum").with_message(
            format!("Sum allows at most {} decimal places", MAX_SUM_SCALE).into(),
        ));
    }
    Ok(())
}

impl CreateTransferRequest {
    /// Field rules plus the sender-dependent self-transfer rule
    pub fn check(&self, sender_id: AccountId) -> Result<(), ApiError> {
        self.validate()
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        if self.recipient_id == sender_id {
            return Err(TransferError::SelfTransfer.into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub transfers: Vec<CensoredView>,
}

/// Create a transfer from the caller's account
///
/// POST /api/v1/transfers
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Account>,
    Json(req): Json<CreateTransferRequest>,
) -> ApiResult<CensoredView> {
    req.check(viewer.id)?;
    let view = state
        .transfers
        .transfer(&viewer, req.recipient_id, req.sum)
        .await?;
    created(view)
}

/// Caller's recent transfers, newest first
///
/// GET /api/v1/transfers?limit=N
pub async fn list_transfers(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Account>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<TransferListResponse> {
    let limit = query
        .limit
        .unwrap_or(state.config.ledger.history_limit)
        .min(MAX_HISTORY_LIMIT);
    let transfers = state.transfers.history(&viewer, limit).await?;
    ok(TransferListResponse { transfers })
}

/// GET /api/v1/transfers/{id}
pub async fn get_transfer(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Account>,
    Path(transfer_id): Path<TransferId>,
) -> ApiResult<CensoredView> {
    if transfer_id == 0 {
        return ApiError::bad_request("Invalid transfer ID").into_err();
    }
    ok(state.transfers.view(&viewer, transfer_id).await?)
}

/// Repeat one of the caller's transfers with its original recipient and sum
///
/// POST /api/v1/transfers/{id}/repeat
pub async fn repeat_transfer(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Account>,
    Path(transfer_id): Path<TransferId>,
) -> ApiResult<CensoredView> {
    if transfer_id == 0 {
        return ApiError::bad_request("Invalid transfer ID").into_err();
    }
    created(state.transfers.repeat(&viewer, transfer_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn request(json: &str) -> CreateTransferRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_sum_as_string_or_number() {
        assert_eq!(request(r#"{"recipient_id":2,"sum":"12.50"}"#).sum, Decimal::new(1250, 2));
        assert_eq!(request(r#"{"recipient_id":2,"sum":12}"#).sum, Decimal::from(12));
    }

    #[test]
    fn test_check_rejects_bad_input() {
        let err = request(r#"{"recipient_id":2,"sum":"0"}"#).check(1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = request(r#"{"recipient_id":2,"sum":"-5"}"#).check(1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = request(r#"{"recipient_id":0,"sum":"5"}"#).check(1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = request(r#"{"recipient_id":2,"sum":"0.000000001"}"#).check(1).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        // Trailing zeros beyond the stored scale are harmless
        assert!(request(r#"{"recipient_id":2,"sum":"1.500000000"}"#).check(1).is_ok());
    }

    #[test]
    fn test_check_rejects_self_transfer() {
        let err = request(r#"{"recipient_id":1,"sum":"5"}"#).check(1).unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(request(r#"{"recipient_id":2,"sum":"5"}"#).check(1).is_ok());
    }
}
