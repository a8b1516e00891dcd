//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiError`: Error response, convertible from [`LedgerError`] and extractor rejections
//! - `error_codes`: Standard error code constants

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::ledger::LedgerError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - error: stable error string (error only)
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Stable error string, e.g. `insufficient_funds` (only present when code != 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            error: None,
            data: Some(data),
        }
    }

    pub fn error(code: i32, error: &str, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            error: Some(error.to_string()),
            data: None,
        }
    }
}

/// Handler result: status + enveloped body, or an [`ApiError`]
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK with `data`
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// 201 Created with `data`
pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    /// Stable error string, see [`LedgerError::code`]
    pub error: &'static str,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, error: &'static str, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            error,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            error_codes::INVALID_PARAMETER,
            "invalid_input",
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            "unavailable",
            msg,
        )
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, self.error, self.msg);
        (self.status, Json(body)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = match &e {
            LedgerError::InvalidInput(_) => error_codes::INVALID_PARAMETER,
            LedgerError::InvalidAmount => error_codes::INVALID_AMOUNT,
            LedgerError::SameAccount => error_codes::SAME_ACCOUNT,
            LedgerError::InsufficientFunds { .. } => error_codes::INSUFFICIENT_FUNDS,
            LedgerError::Overflow => error_codes::BALANCE_OVERFLOW,
            LedgerError::KycRejected { .. } => error_codes::KYC_REJECTED,
            LedgerError::AccountNotFound(_) => error_codes::ACCOUNT_NOT_FOUND,
            LedgerError::Storage(_) => error_codes::INTERNAL_ERROR,
            LedgerError::GateUnavailable(_) => error_codes::GATE_UNAVAILABLE,
            LedgerError::LockTimeout => error_codes::LOCK_TIMEOUT,
        };
        // Storage details stay in the logs.
        let msg = match &e {
            LedgerError::Storage(_) => "internal error".to_string(),
            _ => e.to_string(),
        };
        Self::new(status, code, e.code(), msg)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INVALID_AMOUNT: i32 = 1002;
    pub const SAME_ACCOUNT: i32 = 1003;
    pub const INSUFFICIENT_FUNDS: i32 = 1004;
    pub const BALANCE_OVERFLOW: i32 = 1005;

    // Risk errors (3xxx)
    pub const KYC_REJECTED: i32 = 3001;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const GATE_UNAVAILABLE: i32 = 5002;
    pub const LOCK_TIMEOUT: i32 = 5003;
}
