//! Database connection management
//!
//! One PostgreSQL pool per process. It is created on first use through
//! [`Database::shared`] and torn down explicitly with [`Database::close`]
//! during shutdown. Transfers borrow one connection for the lifetime of their
//! transaction and hand it back on commit or rollback.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::sync::OnceCell;

use crate::config::StorageConfig;

static SHARED: OnceCell<Database> = OnceCell::const_new();

/// PostgreSQL database connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Process-wide pool, connected on the first call
    ///
    /// Later calls return the same pool and ignore `config`.
    pub async fn shared(config: &StorageConfig) -> Result<&'static Database, sqlx::Error> {
        SHARED
            .get_or_try_init(|| async {
                let url = config.postgres_url.as_deref().ok_or_else(|| {
                    sqlx::Error::Configuration("storage.postgres_url is not set".into())
                })?;
                Database::connect(
                    url,
                    config.max_connections,
                    Duration::from_millis(config.acquire_timeout_ms),
                )
                .await
            })
            .await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool; waits for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL connection pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}
