use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use thiserror::Error;

use crate::risk_gate::DEFAULT_ADMISSION_THRESHOLD;

/// Overrides `storage.postgres_url`
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Overrides `risk_gate.base_url`
pub const ENV_KYC_BASE_URL: &str = "KYC_BASE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub risk_gate: RiskGateConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub postgres_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            postgres_url: None,
            max_connections: 10,
            acquire_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskGateMode {
    Http,
    Static,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RiskGateConfig {
    pub mode: RiskGateMode,
    pub base_url: Option<String>,
    pub timeout_ms: u64,
    pub threshold: f64,
    /// Owner → score table for `mode: static`
    pub static_scores: HashMap<String, f64>,
    /// Score for owners missing from `static_scores`
    pub default_score: Option<f64>,
}

impl Default for RiskGateConfig {
    fn default() -> Self {
        Self {
            mode: RiskGateMode::Http,
            base_url: None,
            timeout_ms: 3000,
            threshold: DEFAULT_ADMISSION_THRESHOLD,
            static_scores: HashMap::new(),
            default_score: None,
        }
    }
}

impl RiskGateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LedgerConfig {
    /// Upper bound on waiting for one account row lock
    pub lock_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 2000,
        }
    }
}

impl LedgerConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml`, apply environment overrides and validate
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `DATABASE_URL` / `KYC_BASE_URL` from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL).filter(|v| !v.is_empty()) {
            self.storage.postgres_url = Some(url);
        }
        if let Some(url) = lookup(ENV_KYC_BASE_URL).filter(|v| !v.is_empty()) {
            self.risk_gate.base_url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.backend == StorageBackend::Postgres
            && self.storage.postgres_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::Invalid(format!(
                "storage.backend is postgres but no postgres_url (or {}) is set",
                ENV_DATABASE_URL
            )));
        }
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be at least 1".into(),
            ));
        }
        if self.risk_gate.mode == RiskGateMode::Http
            && self.risk_gate.base_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(ConfigError::Invalid(format!(
                "risk_gate.mode is http but no base_url (or {}) is set",
                ENV_KYC_BASE_URL
            )));
        }
        if !self.risk_gate.threshold.is_finite() {
            return Err(ConfigError::Invalid("risk_gate.threshold must be finite".into()));
        }
        if self.ledger.lock_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "ledger.lock_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
log_level: "info"
log_dir: "./logs"
log_file: "ledger.log"
use_json: false
rotation: "daily"
gateway:
  host: "127.0.0.1"
  port: 8080
"#;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.storage.max_connections, 10);
        assert_eq!(config.risk_gate.mode, RiskGateMode::Http);
        assert_eq!(config.risk_gate.threshold, 500.0);
        assert_eq!(config.ledger.lock_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_full_config() {
        let yaml = format!(
            "{}{}",
            MINIMAL,
            r#"
storage:
  backend: memory
risk_gate:
  mode: static
  threshold: 600
  static_scores:
    alice: 720
    charlie: 450
  default_score: 550
ledger:
  lock_timeout_ms: 250
"#
        );

        let config = AppConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.risk_gate.mode, RiskGateMode::Static);
        assert_eq!(config.risk_gate.threshold, 600.0);
        assert_eq!(config.risk_gate.static_scores.get("alice"), Some(&720.0));
        assert_eq!(config.risk_gate.default_score, Some(550.0));
        assert_eq!(config.ledger.lock_timeout_ms, 250);
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert!(config.validate().is_err());

        config.apply_overrides(|key| match key {
            ENV_DATABASE_URL => Some("postgres://ledger@localhost/ledger".into()),
            ENV_KYC_BASE_URL => Some("http://kyc.local".into()),
            _ => None,
        });

        assert_eq!(
            config.storage.postgres_url.as_deref(),
            Some("postgres://ledger@localhost/ledger")
        );
        assert_eq!(config.risk_gate.base_url.as_deref(), Some("http://kyc.local"));
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_zero_lock_timeout() {
        let mut config = AppConfig::from_yaml(MINIMAL).unwrap();
        config.storage.backend = StorageBackend::Memory;
        config.risk_gate.mode = RiskGateMode::Static;
        config.ledger.lock_timeout_ms = 0;

        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let yaml = format!("{}storage:\n  backend: sqlite\n", MINIMAL);
        assert!(matches!(
            AppConfig::from_yaml(&yaml),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::load("does-not-exist"),
            Err(ConfigError::Read { .. })
        ));
    }
}
