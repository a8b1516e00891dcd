//! Gateway types module
//!
//! - [`request`]: Request/response DTOs
//! - [`response`]: Response envelope, API errors and error codes

pub mod request;
pub mod response;

pub use request::{BalanceData, OpenAccountData, OpenAccountRequest, TransferData, TransferRequest};
pub use response::{ApiError, ApiResponse, ApiResult, created, error_codes, ok};
