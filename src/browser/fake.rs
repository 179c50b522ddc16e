use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::browser::{BrowserLauncher, TableBrowser};
use crate::error::{AppError, Result};
use crate::types::{RawCell, RawTableRow};

/// In-memory stand-in for a paginated table page.
#[derive(Debug, Clone, Default)]
pub struct FakeBrowser {
    pub pages: Vec<Vec<RawTableRow>>,
    pub current: usize,
    pub opened: Option<String>,
    pub clicks: usize,
    /// The table never renders.
    pub table_missing: bool,
    /// After clicking onto this page index, the table cannot be re-located.
    pub lose_table_on: Option<usize>,
    /// Reading the "next" control fails on this page index.
    pub next_error_on: Option<usize>,
    /// Pages without a pagination label.
    pub hide_labels: bool,
}

impl FakeBrowser {
    pub fn with_pages(pages: Vec<Vec<RawTableRow>>) -> Self {
        Self { pages, ..Default::default() }
    }
}

impl TableBrowser for FakeBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        self.opened = Some(url.to_string());
        self.current = 0;
        Ok(())
    }

    fn wait_for_table(&mut self, _timeout: Duration) -> Result<bool> {
        if self.table_missing || self.pages.is_empty() {
            return Ok(false);
        }
        Ok(self.lose_table_on != Some(self.current))
    }

    fn current_page_label(&mut self) -> Result<Option<String>> {
        if self.hide_labels {
            return Err(AppError::Browser("pagination link not found".to_string()));
        }
        Ok(Some((self.current + 1).to_string()))
    }

    fn current_rows(&mut self) -> Result<Vec<RawTableRow>> {
        self.pages
            .get(self.current)
            .cloned()
            .ok_or_else(|| AppError::ScrapeUnavailable("no such page".to_string()))
    }

    fn is_next_disabled(&mut self) -> Result<bool> {
        if self.next_error_on == Some(self.current) {
            return Err(AppError::Browser("next control not found".to_string()));
        }
        Ok(self.current + 1 >= self.pages.len())
    }

    fn click_next(&mut self) -> Result<()> {
        self.clicks += 1;
        self.current += 1;
        Ok(())
    }
}

/// Hands out clones of one scripted browser and counts launches.
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    pub template: FakeBrowser,
    pub launches: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(template: FakeBrowser) -> Self {
        Self { template, launches: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

impl BrowserLauncher for FakeLauncher {
    type Browser = FakeBrowser;

    fn launch(&self) -> Result<FakeBrowser> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(self.template.clone())
    }
}

/// Builds a `<tr>` whose cells carry the same text and markup.
pub fn tr(cells: &[&str]) -> RawTableRow {
    cells.iter().map(|c| RawCell::new(*c, *c)).collect()
}

/// A page as the site renders it: header, data rows, summary footer.
pub fn page(data: Vec<RawTableRow>) -> Vec<RawTableRow> {
    let mut rows = vec![Vec::new()];
    rows.extend(data);
    rows.push(tr(&["Total", "", ""]));
    rows
}

/// A ten-column market row; columns 7 and 8 are the ones the scraper drops.
pub fn market_tr(desc: &str, trades: &str, tta: &str, lty_html: &str) -> RawTableRow {
    let mut row = tr(&[desc, trades, tta, "99.10", "99.50", "99.00", "99.25", "x", "y"]);
    row.push(RawCell::new("", lty_html));
    row
}
