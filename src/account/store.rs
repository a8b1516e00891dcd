//! Account store port
//!
//! The storage engine contract shared by the PostgreSQL store and the
//! in-memory store. The ledger service depends only on this trait.

use async_trait::async_trait;
use thiserror::Error;

use super::models::Account;
use crate::core_types::{AccountId, MinorUnits};

/// PostgreSQL SQLSTATE: lock_not_available (raised when `lock_timeout` fires)
const SQLSTATE_LOCK_NOT_AVAILABLE: &str = "55P03";
/// PostgreSQL SQLSTATE: deadlock_detected
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";
/// PostgreSQL SQLSTATE: numeric_value_out_of_range
const SQLSTATE_NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Storage engine errors
///
/// `AccountNotFound` and `InsufficientFunds` are only ever produced by
/// `transfer`, after both row locks are held.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: MinorUnits,
        requested: MinorUnits,
    },

    #[error("Transfer amount must be positive")]
    InvalidAmount,

    #[error("Source and destination account are the same")]
    SameAccount,

    #[error("Timed out waiting for account row lock")]
    LockTimeout,

    #[error("Balance would overflow")]
    Overflow,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            match db_err.code().as_deref() {
                Some(SQLSTATE_LOCK_NOT_AVAILABLE) | Some(SQLSTATE_DEADLOCK_DETECTED) => {
                    return StoreError::LockTimeout;
                }
                Some(SQLSTATE_NUMERIC_OUT_OF_RANGE) => return StoreError::Overflow,
                _ => {}
            }
        }
        StoreError::Database(e.to_string())
    }
}

/// Storage engine trait
///
/// Implementations must run `transfer` as a single atomic unit: both rows are
/// locked in [`lock_order`] before either balance is read, and a failed
/// transfer leaves both balances untouched.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Store name for logging
    fn name(&self) -> &'static str;

    /// Insert a new account row and return its freshly assigned id
    async fn create_account(
        &self,
        owner: &str,
        initial_balance: MinorUnits,
    ) -> Result<AccountId, StoreError>;

    /// Read an account; `None` when no such row exists
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Atomically move `amount` from `from` to `to`
    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: MinorUnits,
    ) -> Result<(), StoreError>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Canonical row lock order for a transfer: lower id first.
///
/// Independent of call direction, so A→B and B→A contend on the same first
/// lock instead of each holding one and waiting for the other.
#[inline]
pub fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b { (a, b) } else { (b, a) }
}
