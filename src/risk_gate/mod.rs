//! Risk Gate
//!
//! Admission check for new accounts. An external oracle scores the owner and
//! the gate turns the score into an admit/deny decision. Oracle failures are a
//! third outcome ([`GateError`]) and are never folded into admit or deny.
//!
//! - [`HttpRiskGate`]: `GET {base_url}/v1/score?owner=..` against the KYC oracle
//! - [`StaticRiskGate`]: fixed score table for local development and tests

pub mod fixed;
pub mod http;

pub use fixed::StaticRiskGate;
pub use http::HttpRiskGate;

use async_trait::async_trait;
use thiserror::Error;

/// Minimum score for admission
pub const DEFAULT_ADMISSION_THRESHOLD: f64 = 500.0;

/// Outcome of a successful oracle query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskDecision {
    Admitted { score: f64 },
    Denied { score: f64 },
}

impl RiskDecision {
    /// `Admitted` when `score >= threshold`
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            RiskDecision::Admitted { score }
        } else {
            RiskDecision::Denied { score }
        }
    }

    #[inline]
    pub fn is_admitted(&self) -> bool {
        matches!(self, RiskDecision::Admitted { .. })
    }
}

/// The oracle could not be consulted or answered with garbage
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Risk oracle request failed: {0}")]
    Request(String),

    #[error("Risk oracle returned HTTP {0}")]
    Status(u16),

    #[error("Malformed risk oracle response: {0}")]
    Malformed(String),

    #[error("No risk score for owner: {0}")]
    UnknownOwner(String),

    #[error("Risk gate configuration error: {0}")]
    Config(String),
}

/// Risk gate port
#[async_trait]
pub trait RiskGate: Send + Sync {
    /// Gate name for logging
    fn name(&self) -> &'static str;

    /// Query the oracle once for `owner` and classify the score
    async fn assess(&self, owner: &str) -> Result<RiskDecision, GateError>;
}
