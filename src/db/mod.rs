pub mod models;
pub mod queries;
pub mod snapshot;
pub mod writer;

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::Config;
use crate::error::{AppError, Result};

pub use snapshot::{fetch_snapshot, Snapshot};
pub use writer::StoreWriter;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Give up acquiring a connection after 30s.
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// SQL expression for "now" in Unix milliseconds; same as the column default.
pub(crate) const NOW_MS: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

/// Open the RegularMarket store and make sure the table exists.
pub async fn connect(cfg: &Config) -> Result<SqlitePool> {
    let path = cfg
        .db_path
        .as_deref()
        .ok_or_else(|| AppError::Config("DB_PATH is not set".to_string()))?;

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;
    info!("Database ready at {path}");
    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    // One long-lived connection: each in-memory connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    MIGRATOR.run(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_db_path_is_a_config_error_at_connect_time() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        let err = connect(&cfg).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn connect_creates_the_table() {
        let path = std::env::temp_dir().join(format!(
            "market-scraper-connect-{}.db",
            std::process::id()
        ));
        let path_str = path.to_string_lossy().to_string();
        let cfg = Config::from_lookup(|key| (key == "DB_PATH").then(|| path_str.clone())).unwrap();

        let pool = connect(&cfg).await.unwrap();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM RegularMarket")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        pool.close().await;
        let _ = std::fs::remove_file(&path);
    }
}
