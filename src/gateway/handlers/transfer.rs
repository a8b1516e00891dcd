//! Transfer handler

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, TransferData, TransferRequest, ok};

/// Move funds between two accounts
///
/// Atomic: either both balances change or neither does. 503 (lock timeout)
/// is safe to retry.
#[utoipa::path(
    post,
    path = "/transfer",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer committed", body = TransferData),
        (status = 400, description = "Non-positive amount or same account"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "Insufficient funds"),
        (status = 503, description = "Account lock timeout, retry")
    ),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> ApiResult<TransferData> {
    let Json(req) = payload?;

    match state
        .ledger
        .transfer_money(req.from_id, req.to_id, req.amount)
        .await
    {
        Ok(()) => ok(TransferData { ok: true }),
        Err(e) => {
            if e.http_status() >= 500 {
                tracing::error!(
                    from = req.from_id,
                    to = req.to_id,
                    amount = req.amount,
                    error = %e,
                    "transfer failed"
                );
            }
            ApiError::from(e).into_err()
        }
    }
}
