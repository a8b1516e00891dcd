//! Core types used throughout the ledger
//!
//! Plain aliases that give the storage, service and gateway layers a shared
//! vocabulary without forcing conversions at every boundary.

/// Account ID - assigned by the storage engine, immutable after creation.
///
/// # Constraints:
/// - **Unique**: primary key of the `accounts` table (`BIGSERIAL`)
/// - **Monotonic**: later accounts always get larger ids
/// - **Totally ordered**: transfers lock rows in ascending id order
pub type AccountId = i64;

/// Money in minor units of the single unit of account (e.g. cents).
///
/// Signed so that arithmetic underflow is detectable, but a balance is never
/// allowed to go negative as the result of a transfer.
pub type MinorUnits = i64;
