//! HTTP Risk Gate
//!
//! Queries the KYC oracle with `GET {base_url}/v1/score?owner=<owner>` and
//! expects `{"score": <number>}`. A numeric string is accepted as well; any
//! other shape is a [`GateError::Malformed`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use super::{GateError, RiskDecision, RiskGate};

/// Risk gate backed by the HTTP scoring oracle
pub struct HttpRiskGate {
    client: reqwest::Client,
    score_url: String,
    threshold: f64,
}

impl HttpRiskGate {
    pub fn new(base_url: &str, timeout: Duration, threshold: f64) -> Result<Self, GateError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(GateError::Config("risk oracle base URL is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GateError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            score_url: format!("{}/v1/score", base_url),
            threshold,
        })
    }

    async fn fetch_score(&self, owner: &str) -> Result<f64, GateError> {
        let response = self
            .client
            .get(&self.score_url)
            .query(&[("owner", owner)])
            .send()
            .await
            .map_err(|e| GateError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GateError::Status(status.as_u16()));
        }

        let body: JsonValue = response
            .json()
            .await
            .map_err(|e| GateError::Malformed(e.to_string()))?;

        parse_score(&body)
    }
}

#[async_trait]
impl RiskGate for HttpRiskGate {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn assess(&self, owner: &str) -> Result<RiskDecision, GateError> {
        match self.fetch_score(owner).await {
            Ok(score) => {
                let decision = RiskDecision::from_score(score, self.threshold);
                debug!(owner, score, admitted = decision.is_admitted(), "risk oracle answered");
                Ok(decision)
            }
            Err(e) => {
                warn!(owner, error = %e, "risk oracle unavailable");
                Err(e)
            }
        }
    }
}

/// Extract a finite score from the oracle body
fn parse_score(body: &JsonValue) -> Result<f64, GateError> {
    let score = match body.get("score") {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        Some(other) => {
            return Err(GateError::Malformed(format!("score is not numeric: {}", other)));
        }
        None => return Err(GateError::Malformed("missing score field".into())),
    };

    match score {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(GateError::Malformed(format!("invalid score: {}", body))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::{Json, Router};
    use axum::routing::get;
    use serde_json::json;

    async fn fake_score(Query(q): Query<HashMap<String, String>>) -> Response {
        match q.get("owner").map(String::as_str) {
            Some("alice") => Json(json!({ "score": 720 })).into_response(),
            Some("charlie") => Json(json!({ "score": 450 })).into_response(),
            Some("stringy") => Json(json!({ "score": "650" })).into_response(),
            Some("garbage") => Json(json!({ "rating": 1 })).into_response(),
            _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }

    async fn spawn_oracle() -> String {
        let app = Router::new().route("/v1/score", get(fake_score));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn gate(base_url: &str) -> HttpRiskGate {
        HttpRiskGate::new(base_url, Duration::from_secs(2), 500.0).unwrap()
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score(&json!({ "score": 720 })).unwrap(), 720.0);
        assert_eq!(parse_score(&json!({ "score": 499.5 })).unwrap(), 499.5);
        assert_eq!(parse_score(&json!({ "score": " 650 " })).unwrap(), 650.0);
        assert!(matches!(
            parse_score(&json!({})),
            Err(GateError::Malformed(_))
        ));
        assert!(matches!(
            parse_score(&json!({ "score": "abc" })),
            Err(GateError::Malformed(_))
        ));
        assert!(matches!(
            parse_score(&json!({ "score": null })),
            Err(GateError::Malformed(_))
        ));
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(
            HttpRiskGate::new("  ", Duration::from_secs(1), 500.0),
            Err(GateError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_oracle_decisions() {
        let base = spawn_oracle().await;
        let gate = gate(&base);

        let alice = gate.assess("alice").await.unwrap();
        assert_eq!(alice, RiskDecision::Admitted { score: 720.0 });

        let charlie = gate.assess("charlie").await.unwrap();
        assert_eq!(charlie, RiskDecision::Denied { score: 450.0 });

        let stringy = gate.assess("stringy").await.unwrap();
        assert!(stringy.is_admitted());
    }

    #[tokio::test]
    async fn test_oracle_failures_are_errors() {
        let base = spawn_oracle().await;
        let gate = gate(&base);

        assert_eq!(
            gate.assess("nobody").await.unwrap_err(),
            GateError::Status(500)
        );
        assert!(matches!(
            gate.assess("garbage").await.unwrap_err(),
            GateError::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_oracle() {
        let gate = gate("http://127.0.0.1:1");
        assert!(matches!(
            gate.assess("alice").await.unwrap_err(),
            GateError::Request(_)
        ));
    }
}
