//! Ledger
//!
//! Account opening behind the risk gate, balance lookup, and atomic
//! transfers between two accounts.
//!
//! ```text
//! open_account:   validate → RiskGate::assess → AccountStore::create_account
//! get_balance:    AccountStore::get_account
//! transfer_money: validate → AccountStore::transfer (ordered row locks)
//! ```

pub mod error;
pub mod service;


pub use error::LedgerError;
pub use service::LedgerService;
