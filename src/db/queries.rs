use sqlx::SqlitePool;

use crate::db::models::{MarketRecord, SeriesPoint};
use crate::error::Result;

/// Distinct securities, for the dashboard's filter.
pub async fn securities(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query_scalar(
        r#"
        SELECT DISTINCT "Security Description"
        FROM RegularMarket
        ORDER BY "Security Description"
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Stored rows with their Timestamp, oldest first. All securities when
/// `security` is `None`.
pub async fn records(pool: &SqlitePool, security: Option<&str>) -> Result<Vec<MarketRecord>> {
    let rows = sqlx::query_as(
        r#"
        SELECT "Security Description", "Trades", "TTA", "Open", "High", "Low", "LTP", "LTY", "Timestamp"
        FROM RegularMarket
        WHERE ?1 IS NULL OR "Security Description" = ?1
        ORDER BY "Timestamp" ASC, rowid ASC
        "#,
    )
    .bind(security)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Trades and TTA over time for one security.
pub async fn series(pool: &SqlitePool, security: &str) -> Result<Vec<SeriesPoint>> {
    let rows = sqlx::query_as(
        r#"
        SELECT "Timestamp" AS timestamp, "Trades" AS trades, "TTA" AS tta
        FROM RegularMarket
        WHERE "Security Description" = ?
        ORDER BY "Timestamp" ASC, rowid ASC
        "#,
    )
    .bind(security)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
