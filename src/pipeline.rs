use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::browser::BrowserLauncher;
use crate::config::{ChangeDetection, Config, WriteMode};
use crate::db::{self, fetch_snapshot, StoreWriter};
use crate::detector::changed_rows;
use crate::error::{AppError, Result};
use crate::scrape::row::parse_rows;
use crate::scrape::{self, NavigatorSettings};
use crate::types::{RunSummary, ScrapedRow};

/// One scrape → snapshot → detect → write pass.
pub struct Pipeline<L: BrowserLauncher> {
    cfg: Config,
    launcher: L,
    navigator: NavigatorSettings,
}

impl<L: BrowserLauncher> Pipeline<L> {
    pub fn new(cfg: Config, launcher: L) -> Self {
        let navigator = NavigatorSettings::from_config(&cfg);
        Self { cfg, launcher, navigator }
    }

    /// A single attempt. Browser and store are acquired here and released
    /// before returning, on success and failure alike.
    pub async fn run_once(&self, attempt: u32) -> Result<RunSummary> {
        info!(attempt, "Starting scrape attempt");

        let outcome = scrape::scrape(&self.launcher, &self.navigator).await?;
        if outcome.rows.is_empty() {
            return Err(AppError::EmptyResult);
        }

        let (rows, rejected) = parse_rows(&outcome.rows);
        for (raw, reason) in &rejected {
            warn!(?raw, "Dropping unparseable row: {reason}");
        }
        if rows.is_empty() {
            return Err(AppError::EmptyResult);
        }

        let pool = db::connect(&self.cfg).await?;
        let stored = sync_rows(&pool, &rows, self.cfg.change_detection, self.cfg.write_mode).await;
        pool.close().await;
        let (changed, written) = stored?;

        let summary = RunSummary {
            pages: outcome.pages,
            scraped: outcome.rows.len(),
            rejected: rejected.len(),
            changed,
            written,
        };
        info!(
            pages = summary.pages,
            scraped = summary.scraped,
            rejected = summary.rejected,
            changed = summary.changed,
            written = summary.written,
            "Scrape attempt finished"
        );
        Ok(summary)
    }
}

/// Compare `rows` with the store's current contents and write the ones that
/// differ. Returns `(changed, written)`.
pub async fn sync_rows(
    pool: &SqlitePool,
    rows: &[ScrapedRow],
    detection: ChangeDetection,
    mode: WriteMode,
) -> Result<(usize, usize)> {
    let snapshot = fetch_snapshot(pool).await?;
    let changed = changed_rows(rows, &snapshot, detection);
    info!(
        scraped = rows.len(),
        changed = changed.len(),
        stored_securities = snapshot.len(),
        detection = %detection,
        "Change detection done"
    );

    let written = StoreWriter::new(pool.clone(), mode).write(&changed).await?;
    Ok((changed.len(), written))
}
