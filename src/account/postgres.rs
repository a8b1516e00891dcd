//! PostgreSQL account store
//!
//! The durable storage engine. A transfer runs in one transaction that takes
//! `SELECT ... FOR UPDATE` row locks in ascending id order with a
//! transaction-local `lock_timeout`, so contention surfaces as
//! [`StoreError::LockTimeout`] instead of an unbounded wait.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};
use tracing::{debug, info, warn};

use super::models::Account;
use super::store::{AccountStore, StoreError, lock_order};
use crate::core_types::{AccountId, MinorUnits};

/// No CHECK constraint on `balance`: non-negativity is enforced by the
/// transfer protocol under row lock.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id          BIGSERIAL   PRIMARY KEY,
    owner       TEXT        NOT NULL,
    balance     BIGINT      NOT NULL DEFAULT 0,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// PostgreSQL-backed [`AccountStore`]
pub struct PgAccountStore {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PgAccountStore {
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }

    /// Create the `accounts` table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        info!("accounts schema ready");
        Ok(())
    }

    /// Lock one row and read its balance; `None` when the row is absent
    async fn lock_balance(
        conn: &mut PgConnection,
        id: AccountId,
    ) -> Result<Option<MinorUnits>, StoreError> {
        let balance = sqlx::query_scalar::<_, i64>(
            "SELECT balance FROM accounts WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(balance)
    }

    async fn apply_delta(
        conn: &mut PgConnection,
        id: AccountId,
        delta: MinorUnits,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET balance = balance + $1 WHERE id = $2")
            .bind(delta)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn create_account(
        &self,
        owner: &str,
        initial_balance: MinorUnits,
    ) -> Result<AccountId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO accounts (owner, balance) VALUES ($1, $2) RETURNING id",
        )
        .bind(owner)
        .bind(initial_balance)
        .fetch_one(&self.pool)
        .await?;

        debug!(id, owner, initial_balance, "account row inserted");
        Ok(id)
    }

    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query("SELECT id, owner, balance, created_at FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(Account {
                id: r.try_get("id")?,
                owner: r.try_get("owner")?,
                balance: r.try_get("balance")?,
                created_at: r.try_get("created_at")?,
            })),
            None => Ok(None),
        }
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

        // Dropping `tx` on any `?` below rolls the transaction back.
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.lock_timeout.as_millis()))
            .execute(&mut *tx)
            .await?;

        let (first, second) = lock_order(from, to);
        let first_balance = Self::lock_balance(&mut tx, first).await?;
        let second_balance = Self::lock_balance(&mut tx, second).await?;

        let (from_balance, to_balance) = if first == from {
            (first_balance, second_balance)
        } else {
            (second_balance, first_balance)
        };

        let (available, to_balance) = match (from_balance, to_balance) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => {
                let _ = tx.rollback().await;
                debug!(from, "transfer aborted: source account not found");
                return Err(StoreError::AccountNotFound(from));
            }
            (_, None) => {
                let _ = tx.rollback().await;
                debug!(to, "transfer aborted: destination account not found");
                return Err(StoreError::AccountNotFound(to));
            }
        };

        if available < amount {
            let _ = tx.rollback().await;
            debug!(from, available, amount, "transfer aborted: insufficient funds");
            return Err(StoreError::InsufficientFunds {
                available,
                requested: amount,
            });
        }

        if to_balance.checked_add(amount).is_none() {
            let _ = tx.rollback().await;
            warn!(to, to_balance, amount, "transfer aborted: balance overflow");
            return Err(StoreError::Overflow);
        }

        Self::apply_delta(&mut tx, from, -amount).await?;
        Self::apply_delta(&mut tx, to, amount).await?;

        tx.commit().await?;

        debug!(from, to, amount, "transfer committed");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_no_balance_constraint() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS accounts"));
        assert!(!SCHEMA_SQL.to_uppercase().contains("CHECK"));
    }
}
