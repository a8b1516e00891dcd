//! Health check handler

use std::sync::Arc;

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, ok};

/// Health check response data
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Health check endpoint
///
/// - Healthy: 200 OK + {code: 0, data: {ok, version}}
/// - Storage unreachable: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    if state.db.as_ref().is_some_and(|db| db.is_closed()) {
        return ApiError::service_unavailable("unavailable").into_err();
    }

    if let Err(e) = state.ledger.health_check().await {
        tracing::error!("[HEALTH] storage check failed: {}", e);
        return ApiError::service_unavailable("unavailable").into_err();
    }

    ok(HealthResponse {
        ok: true,
        version: state.version.to_string(),
    })
}
