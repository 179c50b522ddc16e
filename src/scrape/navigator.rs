use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::TableBrowser;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::scrape::extractor::extract_rows;
use crate::types::{PaginationState, ScrapeEnd, ScrapeOutcome};

#[derive(Debug, Clone)]
pub struct NavigatorSettings {
    pub url: String,
    /// Bound on waiting for the table, initially and after each page turn.
    pub table_wait: Duration,
    /// Pause after clicking "next" before looking for the table again.
    pub page_settle: Duration,
    pub max_pages: usize,
}

impl NavigatorSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            url: cfg.target_url.clone(),
            table_wait: cfg.table_wait,
            page_settle: cfg.page_settle,
            max_pages: cfg.max_pages.max(1),
        }
    }
}

/// Walks the paginated market table and collects every data row.
pub struct PageNavigator {
    settings: NavigatorSettings,
}

impl PageNavigator {
    pub fn new(settings: NavigatorSettings) -> Self {
        Self { settings }
    }

    /// Read every page, starting from a fresh load of the target URL.
    ///
    /// Fails with `ScrapeUnavailable` if the table never shows up or can't be
    /// found again after turning a page. Trouble with the "next" control only
    /// ends the walk early; rows gathered so far are returned.
    pub fn scrape<B: TableBrowser + ?Sized>(&self, browser: &mut B) -> Result<ScrapeOutcome> {
        info!("Performing web scraping of {}", self.settings.url);
        browser.open(&self.settings.url)?;

        if !browser.wait_for_table(self.settings.table_wait)? {
            return Err(AppError::ScrapeUnavailable(format!(
                "table did not render within {:?}",
                self.settings.table_wait
            )));
        }
        info!("Table found");

        let mut state = PaginationState::default();
        let mut rows = Vec::new();

        let end = loop {
            state.current_label = match browser.current_page_label() {
                Ok(label) => label,
                Err(e) => {
                    debug!("Pagination label lookup failed: {e}");
                    None
                }
            };
            if state.current_label.is_none() {
                warn!("Unable to find pagination link");
            }

            let page_rows = extract_rows(&browser.current_rows()?);
            state.pages_visited += 1;
            debug!(
                page = state.pages_visited,
                label = state.label(),
                rows = page_rows.len(),
                "Page extracted"
            );
            rows.extend(page_rows);

            match browser.is_next_disabled() {
                Ok(true) => {
                    info!("Last page reached");
                    break ScrapeEnd::Exhausted;
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("Error while navigating to the next page: {e}");
                    break ScrapeEnd::Interrupted(e.to_string());
                }
            }

            if state.pages_visited >= self.settings.max_pages {
                warn!(
                    max_pages = self.settings.max_pages,
                    "Page limit reached before the last page; stopping"
                );
                break ScrapeEnd::PageLimit;
            }

            info!("Going to next page, page {}...", state.label());
            if let Err(e) = browser.click_next() {
                warn!("Error while navigating to the next page: {e}");
                break ScrapeEnd::Interrupted(e.to_string());
            }
            std::thread::sleep(self.settings.page_settle);

            debug!("Waiting for the table to refresh...");
            match browser.wait_for_table(self.settings.table_wait) {
                Ok(true) => debug!("Table re-located"),
                Ok(false) => {
                    return Err(AppError::ScrapeUnavailable(format!(
                        "table not found again after leaving page {}",
                        state.label()
                    )));
                }
                Err(e) => {
                    return Err(AppError::ScrapeUnavailable(format!(
                        "table not found again after leaving page {}: {e}",
                        state.label()
                    )));
                }
            }
        };

        info!(
            rows = rows.len(),
            pages = state.pages_visited,
            end = %end,
            "Web scraping completed"
        );
        for row in &rows {
            debug!(?row, "Scraped row");
        }

        Ok(ScrapeOutcome { rows, pages: state.pages_visited, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{page, tr, FakeBrowser};
    use crate::types::RawTableRow;

    fn settings() -> NavigatorSettings {
        NavigatorSettings {
            url: "http://market.test/table".to_string(),
            table_wait: Duration::from_millis(1),
            page_settle: Duration::ZERO,
            max_pages: 50,
        }
    }

    fn pages(n: usize) -> Vec<Vec<RawTableRow>> {
        (0..n)
            .map(|p| {
                let a = format!("S{p}a");
                let b = format!("S{p}b");
                page(vec![
                    tr(&[a.as_str(), "1", "x", "y", "v"]),
                    tr(&[b.as_str(), "2", "x", "y", "w"]),
                ])
            })
            .collect()
    }

    #[test]
    fn walks_every_page_until_next_is_disabled() {
        for n in 1..=6 {
            let mut browser = FakeBrowser::with_pages(pages(n));
            let outcome = PageNavigator::new(settings()).scrape(&mut browser).unwrap();

            assert_eq!(outcome.end, ScrapeEnd::Exhausted);
            assert_eq!(outcome.pages, n);
            assert_eq!(browser.clicks, n - 1);
            assert_eq!(outcome.rows.len(), 2 * n);
        }
    }

    #[test]
    fn rows_keep_page_order() {
        let mut browser = FakeBrowser::with_pages(pages(2));
        let outcome = PageNavigator::new(settings()).scrape(&mut browser).unwrap();
        let names: Vec<&str> = outcome.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["S0a", "S0b", "S1a", "S1b"]);
        assert_eq!(browser.opened.as_deref(), Some("http://market.test/table"));
    }

    #[test]
    fn missing_table_is_unavailable() {
        let mut browser = FakeBrowser::with_pages(pages(2));
        browser.table_missing = true;
        let err = PageNavigator::new(settings()).scrape(&mut browser).unwrap_err();
        assert!(matches!(err, AppError::ScrapeUnavailable(_)));
    }

    #[test]
    fn losing_the_table_after_a_page_turn_is_unavailable() {
        let mut browser = FakeBrowser::with_pages(pages(3));
        browser.lose_table_on = Some(2);
        let err = PageNavigator::new(settings()).scrape(&mut browser).unwrap_err();
        assert!(matches!(err, AppError::ScrapeUnavailable(_)));
    }

    #[test]
    fn next_control_failure_keeps_partial_rows() {
        let mut browser = FakeBrowser::with_pages(pages(4));
        browser.next_error_on = Some(1);
        let outcome = PageNavigator::new(settings()).scrape(&mut browser).unwrap();

        assert!(matches!(outcome.end, ScrapeEnd::Interrupted(_)));
        assert_eq!(outcome.pages, 2);
        assert_eq!(outcome.rows.len(), 4);
    }

    #[test]
    fn missing_pagination_label_does_not_stop_extraction() {
        let mut browser = FakeBrowser::with_pages(pages(3));
        browser.hide_labels = true;
        let outcome = PageNavigator::new(settings()).scrape(&mut browser).unwrap();
        assert_eq!(outcome.end, ScrapeEnd::Exhausted);
        assert_eq!(outcome.rows.len(), 6);
    }

    #[test]
    fn page_cap_bounds_a_never_ending_table() {
        let mut s = settings();
        s.max_pages = 3;
        let mut browser = FakeBrowser::with_pages(pages(10));
        let outcome = PageNavigator::new(s).scrape(&mut browser).unwrap();
        assert_eq!(outcome.end, ScrapeEnd::PageLimit);
        assert_eq!(outcome.pages, 3);
        assert_eq!(browser.clicks, 2);
    }
}
