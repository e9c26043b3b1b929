use std::sync::Arc;

use crate::config::Config;
use crate::database::{JobStore, MemoryJobStore, PgJobStore};
use crate::error::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Opens the configured job store, applying migrations for PostgreSQL.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn JobStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory job store; data is lost on restart");
        return Ok(Arc::new(MemoryJobStore::new()));
    }

    let pool = create_pool(config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");
    Ok(Arc::new(PgJobStore::new(pool)))
}
