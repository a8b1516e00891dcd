//! Ledger Error Types
//!
//! The caller-visible error taxonomy. Storage and risk gate errors are folded
//! into it at the service boundary.

use thiserror::Error;

use crate::account::StoreError;
use crate::core_types::{AccountId, MinorUnits};
use crate::risk_gate::GateError;

/// Ledger error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // === Validation Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source and destination account cannot be the same")]
    SameAccount,

    // === Risk Gate ===
    #[error("KYC rejected (score {score})")]
    KycRejected { score: f64 },

    #[error("Risk gate unavailable: {0}")]
    GateUnavailable(String),

    // === Account Errors ===
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: MinorUnits,
        requested: MinorUnits,
    },

    #[error("Balance would overflow")]
    Overflow,

    // === System Errors ===
    #[error("Timed out waiting for account lock, retry later")]
    LockTimeout,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput(_) => "invalid_input",
            LedgerError::InvalidAmount => "invalid_amount",
            LedgerError::SameAccount => "same_account",
            LedgerError::KycRejected { .. } => "kyc_rejected",
            LedgerError::GateUnavailable(_) => "gate_unavailable",
            LedgerError::AccountNotFound(_) => "account_not_found",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::Overflow => "overflow",
            LedgerError::LockTimeout => "lock_timeout",
            LedgerError::Storage(_) => "storage_error",
        }
    }

    /// HTTP status for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            LedgerError::InvalidInput(_)
            | LedgerError::InvalidAmount
            | LedgerError::SameAccount
            | LedgerError::Overflow => 400,
            LedgerError::KycRejected { .. } => 403,
            LedgerError::AccountNotFound(_) => 404,
            LedgerError::InsufficientFunds { .. } => 409,
            LedgerError::Storage(_) => 500,
            LedgerError::GateUnavailable(_) | LedgerError::LockTimeout => 503,
        }
    }

    /// Transient failures the caller may retry unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::GateUnavailable(_) | LedgerError::LockTimeout
        )
    }
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::AccountNotFound(id) => LedgerError::AccountNotFound(id),
            StoreError::InsufficientFunds {
                available,
                requested,
            } => LedgerError::InsufficientFunds {
                available,
                requested,
            },
            StoreError::InvalidAmount => LedgerError::InvalidAmount,
            StoreError::SameAccount => LedgerError::SameAccount,
            StoreError::LockTimeout => LedgerError::LockTimeout,
            StoreError::Overflow => LedgerError::Overflow,
            StoreError::Database(msg) => LedgerError::Storage(msg),
        }
    }
}

impl From<GateError> for LedgerError {
    fn from(e: GateError) -> Self {
        LedgerError::GateUnavailable(e.to_string())
    }
}
