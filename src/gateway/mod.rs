//! HTTP Gateway
//!
//! | Route | Handler |
//! |---|---|
//! | `POST /accounts` | [`handlers::open_account`] |
//! | `GET /accounts/{id}/balance` | [`handlers::get_balance`] |
//! | `POST /transfer` | [`handlers::create_transfer`] |
//! | `GET /health` | [`handlers::health_check`] |
//! | `GET /api-docs/openapi.json` | OpenAPI document |

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;

use crate::config::GatewayConfig;
pub use state::AppState;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(handlers::open_account))
        .route("/accounts/{id}/balance", get(handlers::get_balance))
        .route("/transfer", post(handlers::create_transfer))
        .route("/health", get(handlers::health_check))
        .with_state(Arc::new(state))
        // Stateless, added after with_state
        .route("/api-docs/openapi.json", get(openapi_json))
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Bind `host:port` and serve until `shutdown` resolves
pub async fn run_server<F>(
    config: &GatewayConfig,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.inspect_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        );
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/api-docs/openapi.json", addr);

    serve(listener, state, shutdown).await?;

    tracing::info!("Gateway stopped");
    Ok(())
}
