//! Account profile handlers

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State},
};

use super::models::Account;
use crate::core_types::AccountId;
use crate::gateway::state::AppState;
use crate::gateway::types::{ApiError, ApiResult, ok};
use crate::user_auth::access::{Operation, authorize};

/// Caller's own profile
///
/// GET /api/v1/account
pub async fn get_own_account(
    Extension(viewer): Extension<Account>,
) -> ApiResult<Account> {
    authorize(viewer.role, Operation::ViewOwnAccount)?;
    ok(viewer)
}

/// Look up an account. Anyone may look up themselves; others need trust.
///
/// GET /api/v1/account/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(viewer): Extension<Account>,
    Path(account_id): Path<AccountId>,
) -> ApiResult<Account> {
    if account_id == 0 {
        return ApiError::bad_request("Invalid account ID").into_err();
    }
    if account_id == viewer.id {
        authorize(viewer.role, Operation::ViewOwnAccount)?;
        return ok(viewer);
    }

    authorize(viewer.role, Operation::ViewOtherAccount)?;
    match state.accounts.get_by_id(account_id).await? {
        Some(account) => ok(account),
        None => ApiError::not_found("Account not found").into_err(),
    }
}
