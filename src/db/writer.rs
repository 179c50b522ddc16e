use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::config::WriteMode;
use crate::db::NOW_MS;
use crate::error::{AppError, Result};
use crate::types::ScrapedRow;

const INSERT_SQL: &str = r#"
    INSERT INTO RegularMarket
        ("Security Description", "Trades", "TTA", "Open", "High", "Low", "LTP", "LTY")
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Persists changed rows to RegularMarket, all of them or none.
pub struct StoreWriter {
    pool: SqlitePool,
    mode: WriteMode,
}

impl StoreWriter {
    pub fn new(pool: SqlitePool, mode: WriteMode) -> Self {
        Self { pool, mode }
    }

    /// Write `rows` inside one transaction and return how many were written.
    ///
    /// The first failing statement aborts the batch; the transaction is
    /// dropped uncommitted so nothing from it becomes visible.
    pub async fn write(&self, rows: &[ScrapedRow]) -> Result<usize> {
        if rows.is_empty() {
            info!("No new or changed rows to store");
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        info!(rows = rows.len(), mode = %self.mode, "Storing scraped data");

        for row in rows {
            let outcome = match self.mode {
                WriteMode::Append => insert_row(&mut tx, row).await,
                WriteMode::Upsert => upsert_row(&mut tx, row).await,
            };
            outcome.map_err(|source| AppError::WriteFailure {
                security: row.security_description.clone(),
                source,
            })?;
            info!("Inserting new data for {}", row.security_description);
        }

        tx.commit()
            .await
            .map_err(|source| AppError::CommitFailure { rows: rows.len(), source })?;
        info!(rows = rows.len(), "Data successfully stored");
        Ok(rows.len())
    }
}

async fn insert_row(conn: &mut SqliteConnection, row: &ScrapedRow) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(INSERT_SQL)
        .bind(&row.security_description)
        .bind(row.trades)
        .bind(row.tta)
        .bind(row.open)
        .bind(row.high)
        .bind(row.low)
        .bind(row.ltp)
        .bind(row.lty)
        .execute(conn)
        .await?;
    Ok(())
}

/// Overwrite the stored values for the security and re-stamp them, or insert
/// when the security is new.
async fn upsert_row(conn: &mut SqliteConnection, row: &ScrapedRow) -> std::result::Result<(), sqlx::Error> {
    let update_sql = format!(
        r#"
        UPDATE RegularMarket
        SET "Trades" = ?, "TTA" = ?, "Open" = ?, "High" = ?, "Low" = ?, "LTP" = ?, "LTY" = ?,
            "Timestamp" = {NOW_MS}
        WHERE "Security Description" = ?
        "#
    );
    let updated = sqlx::query(&update_sql)
        .bind(row.trades)
        .bind(row.tta)
        .bind(row.open)
        .bind(row.high)
        .bind(row.low)
        .bind(row.ltp)
        .bind(row.lty)
        .bind(&row.security_description)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    if updated == 0 {
        insert_row(conn, row).await?;
    } else {
        debug!(updated, "Updated {} in place", row.security_description);
    }
    Ok(())
}
