//! Static Risk Gate
//!
//! Answers from a fixed owner → score table. Used when the service runs
//! without a KYC oracle (`risk_gate.mode: static`) and by tests that need to
//! count oracle calls or simulate an outage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{DEFAULT_ADMISSION_THRESHOLD, GateError, RiskDecision, RiskGate};

pub struct StaticRiskGate {
    scores: HashMap<String, f64>,
    default_score: Option<f64>,
    threshold: f64,
    unavailable: AtomicBool,
    calls: AtomicUsize,
}

impl StaticRiskGate {
    pub fn new(threshold: f64) -> Self {
        Self {
            scores: HashMap::new(),
            default_score: None,
            threshold,
            unavailable: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Build from a configured score table
    pub fn from_table(
        scores: HashMap<String, f64>,
        default_score: Option<f64>,
        threshold: f64,
    ) -> Self {
        Self {
            scores,
            default_score,
            ..Self::new(threshold)
        }
    }

    pub fn with_score(mut self, owner: impl Into<String>, score: f64) -> Self {
        self.scores.insert(owner.into(), score);
        self
    }

    /// Score returned for owners missing from the table
    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = Some(score);
        self
    }

    /// Make every subsequent `assess` fail as if the oracle were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `assess` calls so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticRiskGate {
    fn default() -> Self {
        Self::new(DEFAULT_ADMISSION_THRESHOLD)
    }
}

#[async_trait]
impl RiskGate for StaticRiskGate {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn assess(&self, owner: &str) -> Result<RiskDecision, GateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GateError::Request("risk oracle unavailable".into()));
        }

        let score = self
            .scores
            .get(owner)
            .copied()
            .or(self.default_score)
            .ok_or_else(|| GateError::UnknownOwner(owner.to_string()))?;

        Ok(RiskDecision::from_score(score, self.threshold))
    }
}
