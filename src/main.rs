//! KYC Ledger - HTTP service entry point
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌───────────┐    ┌──────────┐
//! │ Gateway  │───▶│  Ledger  │───▶│ RiskGate  │    │ Account  │
//! │  (axum)  │    │ Service  │───────────────────▶│  Store   │
//! └──────────┘    └──────────┘    └───────────┘    └──────────┘
//! ```
//!
//! Usage: `kyc_ledger [--env dev] [--port 8080]`

use std::sync::Arc;

use anyhow::Context;

use kyc_ledger::config::{AppConfig, RiskGateMode, StorageBackend};
use kyc_ledger::db::Database;
use kyc_ledger::gateway::{self, AppState};
use kyc_ledger::{
    AccountStore, HttpRiskGate, LedgerService, MemoryAccountStore, PgAccountStore, RiskGate,
    StaticRiskGate,
};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

async fn build_store(
    config: &AppConfig,
) -> anyhow::Result<(Arc<dyn AccountStore>, Option<&'static Database>)> {
    let lock_timeout = config.ledger.lock_timeout();

    match config.storage.backend {
        StorageBackend::Postgres => {
            let db = Database::shared(&config.storage)
                .await
                .context("Failed to connect to PostgreSQL")?;
            let store = PgAccountStore::new(db.pool().clone(), lock_timeout);
            store
                .ensure_schema()
                .await
                .context("Failed to provision accounts schema")?;
            Ok((Arc::new(store), Some(db)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory account store, balances are not durable");
            Ok((Arc::new(MemoryAccountStore::new(lock_timeout)), None))
        }
    }
}

fn build_gate(config: &AppConfig) -> anyhow::Result<Arc<dyn RiskGate>> {
    let gate_config = &config.risk_gate;

    match gate_config.mode {
        RiskGateMode::Http => {
            let base_url = gate_config
                .base_url
                .as_deref()
                .context("risk_gate.base_url is not set")?;
            let gate = HttpRiskGate::new(base_url, gate_config.timeout(), gate_config.threshold)?;
            Ok(Arc::new(gate))
        }
        RiskGateMode::Static => Ok(Arc::new(StaticRiskGate::from_table(
            gate_config.static_scores.clone(),
            gate_config.default_score,
            gate_config.threshold,
        ))),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut app_config = AppConfig::load(&env)?;
    if let Some(port) = get_port_override() {
        app_config.gateway.port = port;
    }
    let _log_guard = kyc_ledger::logging::init_logging(&app_config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("LEDGER_GIT_HASH"),
        "Starting KYC Ledger in {} mode",
        env
    );

    let (store, db) = build_store(&app_config).await?;
    let gate = build_gate(&app_config)?;
    let ledger = Arc::new(LedgerService::new(store, gate));

    let state = AppState::new(ledger, db.cloned());
    let result = gateway::run_server(&app_config.gateway, state, shutdown_signal()).await;

    if let Some(db) = db {
        db.close().await;
    }

    result.context("Gateway server error")
}
