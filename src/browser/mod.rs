//! Browser capability used by the page navigator.
//!
//! The navigator only needs a handful of operations on the rendered page, so
//! they are expressed as a trait. `ChromeBrowser` drives a real headless
//! Chrome; tests use a scripted fake.

pub mod chrome;
#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use crate::error::Result;
use crate::types::RawTableRow;

pub use chrome::{ChromeBrowser, ChromeLauncher};

pub trait TableBrowser {
    /// Navigate to `url`.
    fn open(&mut self, url: &str) -> Result<()>;

    /// Wait up to `timeout` for the market table to be present.
    /// `Ok(false)` means it never appeared.
    fn wait_for_table(&mut self, timeout: Duration) -> Result<bool>;

    /// Text of the highlighted pagination link, if there is one.
    fn current_page_label(&mut self) -> Result<Option<String>>;

    /// Every `<tr>` of the currently rendered table, header and footer included.
    fn current_rows(&mut self) -> Result<Vec<RawTableRow>>;

    fn is_next_disabled(&mut self) -> Result<bool>;

    fn click_next(&mut self) -> Result<()>;
}

/// Starts a fresh browser session for each scrape attempt.
pub trait BrowserLauncher: Clone + Send + 'static {
    type Browser: TableBrowser;

    fn launch(&self) -> Result<Self::Browser>;
}
