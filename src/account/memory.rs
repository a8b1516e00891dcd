//! In-memory account store
//!
//! Same contract as the PostgreSQL store, for local development and tests.
//! Every account row carries its own async mutex which plays the role of the
//! database row lock: transfers take the two row locks in ascending id order,
//! each acquisition bounded by the configured lock timeout. The id index is
//! only held for lookups and inserts, never across an await.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use super::models::Account;
use super::store::{AccountStore, StoreError, lock_order};
use crate::core_types::{AccountId, MinorUnits};

struct Row {
    owner: String,
    created_at: DateTime<Utc>,
    balance: Mutex<MinorUnits>,
}

/// In-process [`AccountStore`] with per-row exclusive locks
pub struct MemoryAccountStore {
    rows: RwLock<BTreeMap<AccountId, Arc<Row>>>,
    next_id: AtomicI64,
    lock_timeout: Duration,
}

impl MemoryAccountStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            lock_timeout,
        }
    }

    /// Number of account rows
    pub fn account_count(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    fn row(&self, id: AccountId) -> Result<Option<Arc<Row>>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Database("account index poisoned".into()))?;
        Ok(rows.get(&id).cloned())
    }

    async fn lock<'a>(&self, row: &'a Row) -> Result<MutexGuard<'a, MinorUnits>, StoreError> {
        tokio::time::timeout(self.lock_timeout, row.balance.lock())
            .await
            .map_err(|_| StoreError::LockTimeout)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_account(
        &self,
        owner: &str,
        initial_balance: MinorUnits,
    ) -> Result<AccountId, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Database("account index poisoned".into()))?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        rows.insert(
            id,
            Arc::new(Row {
                owner: owner.to_string(),
                created_at: Utc::now(),
                balance: Mutex::new(initial_balance),
            }),
        );

        debug!(id, owner, initial_balance, "account row inserted");
        Ok(id)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let Some(row) = self.row(id)? else {
            return Ok(None);
        };
        let balance = *self.lock(&row).await?;

        Ok(Some(Account {
            id,
            owner: row.owner.clone(),
            balance,
            created_at: row.created_at,
        }))
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: MinorUnits,
    ) -> Result<(), StoreError> {
        if amount <= 0 {
            return Err(StoreError::InvalidAmount);
        }
        if from == to {
            return Err(StoreError::SameAccount);
        }

        let (first, second) = lock_order(from, to);
        let first_row = self.row(first)?;
        let second_row = self.row(second)?;

        let first_guard = match &first_row {
            Some(row) => Some(self.lock(row).await?),
            None => None,
        };
        let second_guard = match &second_row {
            Some(row) => Some(self.lock(row).await?),
            None => None,
        };

        let (from_guard, to_guard) = if first == from {
            (first_guard, second_guard)
        } else {
            (second_guard, first_guard)
        };

        let (mut from_balance, mut to_balance) = match (from_guard, to_guard) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Err(StoreError::AccountNotFound(from)),
            (_, None) => return Err(StoreError::AccountNotFound(to)),
        };

        if *from_balance < amount {
            return Err(StoreError::InsufficientFunds {
                available: *from_balance,
                requested: amount,
            });
        }

        // Compute both sides before writing either.
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(StoreError::Overflow)?;
        let credited = to_balance.checked_add(amount).ok_or(StoreError::Overflow)?;

        *from_balance = debited;
        *to_balance = credited;

        debug!(from, to, amount, "transfer committed");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
