//! HTTP handlers

pub mod account;
pub mod health;
pub mod transfer;

pub use account::{get_balance, open_account};
pub use health::{HealthResponse, health_check};
pub use transfer::create_transfer;

