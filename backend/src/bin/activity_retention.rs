use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use icetracer_backend::{
    config::Config, db::connection::create_pool, repositories::activity_log as activity_log_repo,
};

/// Deletes activity rows older than `ACTIVITY_LOG_RETENTION_DAYS`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "activity_retention=info,icetracer_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url, 1).await?;

    let cutoff = config.retention_cutoff(Utc::now())?;
    let deleted = activity_log_repo::delete_activity_logs_before(&pool, cutoff).await?;
    tracing::info!(
        deleted,
        cutoff = %cutoff,
        retention_days = config.activity_log_retention_days,
        "Pruned activity log"
    );

    if deleted > 0 {
        sqlx::query("VACUUM (ANALYZE) activity_logs")
            .execute(&pool)
            .await?;
    }

    pool.close().await;
    Ok(())
}
