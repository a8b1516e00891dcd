//! KYC Ledger - risk-gated accounts and atomic transfers
//!
//! # Modules
//!
//! - [`core_types`] - Core type definitions (AccountId, MinorUnits)
//! - [`account`] - Account model and storage engines (PostgreSQL, in-memory)
//! - [`risk_gate`] - KYC oracle client and admission decision
//! - [`ledger`] - Ledger service and error taxonomy
//! - [`db`] - Process-wide PostgreSQL pool
//! - [`gateway`] - HTTP API (axum)
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod risk_gate;

// Convenient re-exports at crate root
pub use account::{Account, AccountStore, MemoryAccountStore, PgAccountStore, StoreError};
pub use core_types::{AccountId, MinorUnits};
pub use ledger::{LedgerError, LedgerService};
pub use risk_gate::{GateError, HttpRiskGate, RiskDecision, RiskGate, StaticRiskGate};
