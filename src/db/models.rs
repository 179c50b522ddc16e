//! Row types for the RegularMarket table. Column names carry spaces and
//! capitals, hence the renames.
use serde::Serialize;

use crate::types::ScrapedRow;

/// The eight comparable columns of a stored row.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredRow {
    #[sqlx(rename = "Security Description")]
    pub security_description: String,
    #[sqlx(rename = "Trades")]
    pub trades: i64,
    #[sqlx(rename = "TTA")]
    pub tta: f64,
    #[sqlx(rename = "Open")]
    pub open: Option<f64>,
    #[sqlx(rename = "High")]
    pub high: Option<f64>,
    #[sqlx(rename = "Low")]
    pub low: Option<f64>,
    #[sqlx(rename = "LTP")]
    pub ltp: Option<f64>,
    #[sqlx(rename = "LTY")]
    pub lty: Option<f64>,
}

impl From<&ScrapedRow> for StoredRow {
    fn from(r: &ScrapedRow) -> Self {
        Self {
            security_description: r.security_description.clone(),
            trades: r.trades,
            tta: r.tta,
            open: r.open,
            high: r.high,
            low: r.low,
            ltp: r.ltp,
            lty: r.lty,
        }
    }
}

/// A full stored row, Timestamp included (Unix milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MarketRecord {
    #[sqlx(rename = "Security Description")]
    #[serde(rename = "Security Description")]
    pub security_description: String,
    #[sqlx(rename = "Trades")]
    #[serde(rename = "Trades")]
    pub trades: i64,
    #[sqlx(rename = "TTA")]
    #[serde(rename = "TTA")]
    pub tta: f64,
    #[sqlx(rename = "Open")]
    #[serde(rename = "Open")]
    pub open: Option<f64>,
    #[sqlx(rename = "High")]
    #[serde(rename = "High")]
    pub high: Option<f64>,
    #[sqlx(rename = "Low")]
    #[serde(rename = "Low")]
    pub low: Option<f64>,
    #[sqlx(rename = "LTP")]
    #[serde(rename = "LTP")]
    pub ltp: Option<f64>,
    #[sqlx(rename = "LTY")]
    #[serde(rename = "LTY")]
    pub lty: Option<f64>,
    #[sqlx(rename = "Timestamp")]
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
}

/// One point of the Trades/TTA chart for a security.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub trades: i64,
    pub tta: f64,
}
