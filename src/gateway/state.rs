use std::sync::Arc;

use crate::db::Database;
use crate::ledger::LedgerService;

/// Gateway shared state
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    /// PostgreSQL pool (None with the in-memory store)
    pub db: Option<Database>,
    /// Reported by `/health`
    pub version: &'static str,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>, db: Option<Database>) -> Self {
        Self {
            ledger,
            db,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
