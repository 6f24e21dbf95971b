use sqlx::postgres::{PgPool, PgPoolOptions};

pub type DbPool = PgPool;

/// Builds the process-wide pool. Callers own it and close it on shutdown.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}
