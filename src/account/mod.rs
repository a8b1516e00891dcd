//! Account storage engine
//!
//! Owns account rows and executes the atomic transfer protocol. Two stores
//! implement the same [`AccountStore`] port: PostgreSQL for durable storage and
//! an in-memory store for development and tests.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

// Re-export commonly used types
pub use memory::MemoryAccountStore;
pub use models::Account;
pub use postgres::PgAccountStore;
pub use store::{AccountStore, StoreError, lock_order};
