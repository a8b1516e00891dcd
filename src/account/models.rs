//! Data models for ledger accounts

use chrono::{DateTime, Utc};

use crate::core_types::{AccountId, MinorUnits};

/// A ledger account row
///
/// Owned by the storage engine. Everything outside `account` refers to an
/// account by its id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub owner: String,
    pub balance: MinorUnits,
    pub created_at: DateTime<Utc>,
}
