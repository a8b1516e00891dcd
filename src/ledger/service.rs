//! Ledger Service
//!
//! Orchestrates account opening (risk gate, then storage) and exposes the
//! balance and transfer operations with domain error semantics.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::LedgerError;
use crate::account::AccountStore;
use crate::core_types::{AccountId, MinorUnits};
use crate::risk_gate::{RiskDecision, RiskGate};

pub struct LedgerService {
    store: Arc<dyn AccountStore>,
    gate: Arc<dyn RiskGate>,
}

impl LedgerService {
    pub fn new(store: Arc<dyn AccountStore>, gate: Arc<dyn RiskGate>) -> Self {
        info!(store = store.name(), gate = gate.name(), "ledger service ready");
        Self { store, gate }
    }

    /// Open an account for `owner` if the risk gate admits them.
    ///
    /// Input is validated before the oracle is consulted. A denial or an
    /// oracle failure creates no row.
    pub async fn open_account(
        &self,
        owner: &str,
        initial: Option<MinorUnits>,
    ) -> Result<AccountId, LedgerError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(LedgerError::InvalidInput("owner must not be empty".into()));
        }

        let initial = initial.unwrap_or(0);
        if initial < 0 {
            return Err(LedgerError::InvalidInput(
                "initial balance must not be negative".into(),
            ));
        }

        match self.gate.assess(owner).await? {
            RiskDecision::Admitted { score } => {
                let id = self.store.create_account(owner, initial).await?;
                info!(id, owner, score, initial, "account opened");
                Ok(id)
            }
            RiskDecision::Denied { score } => {
                warn!(owner, score, "account opening rejected by risk gate");
                Err(LedgerError::KycRejected { score })
            }
        }
    }

    pub async fn get_balance(&self, id: AccountId) -> Result<MinorUnits, LedgerError> {
        self.store
            .get_account(id)
            .await?
            .map(|account| account.balance)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Move `amount` from `from` to `to` atomically.
    ///
    /// Either both balances change or neither does.
    pub async fn transfer_money(
        &self,
        from: AccountId,
        to: AccountId,
        amount: MinorUnits,
    ) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount);
        }
        if from == to {
            return Err(LedgerError::SameAccount);
        }

        match self.store.transfer(from, to, amount).await {
            Ok(()) => {
                info!(from, to, amount, "transfer completed");
                Ok(())
            }
            Err(e) => {
                let err = LedgerError::from(e);
                if err.is_retryable() {
                    warn!(from, to, amount, error = %err, "transfer contended");
                } else {
                    debug!(from, to, amount, error = %err, "transfer rejected");
                }
                Err(err)
            }
        }
    }

    /// Storage readiness
    pub async fn health_check(&self) -> Result<(), LedgerError> {
        self.store.health_check().await.map_err(LedgerError::from)
    }
}
