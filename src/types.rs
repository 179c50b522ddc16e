use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Browser-side table cells
// ---------------------------------------------------------------------------

/// One `<td>` as seen by the browser: rendered text plus raw markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCell {
    pub text: String,
    pub html: String,
}

impl RawCell {
    pub fn new(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self { text: text.into(), html: html.into() }
    }
}

/// All cells of one `<tr>`, in column order.
pub type RawTableRow = Vec<RawCell>;

/// A table row after column filtering, still as strings.
pub type RawRow = Vec<String>;

// ---------------------------------------------------------------------------
// Scraped market row
// ---------------------------------------------------------------------------

/// Number of fields in a scraped row: description plus seven values.
pub const ROW_WIDTH: usize = 8;

/// One security's line from the market table, typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedRow {
    pub security_description: String,
    pub trades: i64,
    pub tta: f64,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub ltp: Option<f64>,
    pub lty: Option<f64>,
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Diagnostic cursor kept while walking pages. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages whose rows have been read so far.
    pub pages_visited: usize,
    /// Label of the highlighted pagination link, when the page shows one.
    pub current_label: Option<String>,
}

impl PaginationState {
    pub fn label(&self) -> &str {
        self.current_label.as_deref().unwrap_or("?")
    }
}

/// Why the navigator stopped walking pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEnd {
    /// The "next" control was disabled: every page was read.
    Exhausted,
    /// Pagination failed part-way; rows collected so far are kept.
    Interrupted(String),
    /// The page cap was reached before "next" disabled.
    PageLimit,
}

impl std::fmt::Display for ScrapeEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeEnd::Exhausted => write!(f, "exhausted"),
            ScrapeEnd::Interrupted(reason) => write!(f, "interrupted ({reason})"),
            ScrapeEnd::PageLimit => write!(f, "page limit"),
        }
    }
}

/// Everything one scrape produced.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub rows: Vec<RawRow>,
    pub pages: usize,
    pub end: ScrapeEnd,
}

// ---------------------------------------------------------------------------
// Pipeline summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub scraped: usize,
    /// Raw rows that could not be typed and were dropped.
    pub rejected: usize,
    pub changed: usize,
    pub written: usize,
}
