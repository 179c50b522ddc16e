use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::db::models::StoredRow;
use crate::error::Result;

/// Stored state the scraped rows are compared against, keyed by security.
///
/// Loaded fresh for every write cycle. When a security has several stored
/// rows (append mode keeps history) the most recent one wins.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    latest: HashMap<String, StoredRow>,
    row_count: usize,
}

impl Snapshot {
    /// `rows` must be in Timestamp order, oldest first.
    pub fn from_rows(rows: impl IntoIterator<Item = StoredRow>) -> Self {
        let mut snapshot = Self::default();
        for row in rows {
            snapshot.row_count += 1;
            snapshot.latest.insert(row.security_description.clone(), row);
        }
        snapshot
    }

    pub fn get(&self, security_description: &str) -> Option<&StoredRow> {
        self.latest.get(security_description)
    }

    /// Distinct securities.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Stored rows read, history included.
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

/// Read every stored row (Timestamp excluded) into a `Snapshot`.
pub async fn fetch_snapshot(pool: &SqlitePool) -> Result<Snapshot> {
    let rows: Vec<StoredRow> = sqlx::query_as(
        r#"
        SELECT "Security Description", "Trades", "TTA", "Open", "High", "Low", "LTP", "LTY"
        FROM RegularMarket
        ORDER BY "Timestamp" ASC, rowid ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let snapshot = Snapshot::from_rows(rows);
    debug!(
        rows = snapshot.row_count(),
        securities = snapshot.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}
