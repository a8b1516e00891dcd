//! Account handlers: open account, balance lookup

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, BalanceData, OpenAccountData, OpenAccountRequest, created, ok,
};
use crate::core_types::AccountId;

/// Open a new account
///
/// The owner is scored by the KYC oracle first; nothing is created unless the
/// score clears the admission threshold.
#[utoipa::path(
    post,
    path = "/accounts",
    request_body = OpenAccountRequest,
    responses(
        (status = 201, description = "Account created", body = OpenAccountData),
        (status = 400, description = "Blank owner or negative initial balance"),
        (status = 403, description = "KYC rejected"),
        (status = 503, description = "Risk oracle unavailable")
    ),
    tag = "Account"
)]
pub async fn open_account(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OpenAccountRequest>, JsonRejection>,
) -> ApiResult<OpenAccountData> {
    let Json(req) = payload?;

    match state.ledger.open_account(&req.owner, req.initial).await {
        Ok(id) => created(OpenAccountData { id }),
        Err(e) => {
            if e.http_status() >= 500 {
                tracing::error!(owner = %req.owner, error = %e, "open account failed");
            }
            ApiError::from(e).into_err()
        }
    }
}

/// Get account balance
#[utoipa::path(
    get,
    path = "/accounts/{id}/balance",
    params(("id" = i64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Current balance", body = BalanceData),
        (status = 400, description = "Non-integer account id"),
        (status = 404, description = "Account not found")
    ),
    tag = "Account"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    id: Result<Path<AccountId>, PathRejection>,
) -> ApiResult<BalanceData> {
    let Path(id) = id?;

    match state.ledger.get_balance(id).await {
        Ok(balance) => ok(BalanceData { balance }),
        Err(e) => {
            if e.http_status() >= 500 {
                tracing::error!(id, error = %e, "balance lookup failed");
            }
            ApiError::from(e).into_err()
        }
    }
}
