pub mod extractor;
pub mod navigator;
pub mod row;

pub use navigator::{NavigatorSettings, PageNavigator};

use crate::browser::BrowserLauncher;
use crate::error::{AppError, Result};
use crate::types::ScrapeOutcome;

/// Launch a browser, read every page and shut the browser down again.
///
/// Browser automation blocks, so the work runs on tokio's blocking pool. The
/// session is dropped inside the closure whether the scrape succeeds or not.
pub async fn scrape<L: BrowserLauncher>(
    launcher: &L,
    settings: &NavigatorSettings,
) -> Result<ScrapeOutcome> {
    let launcher = launcher.clone();
    let navigator = PageNavigator::new(settings.clone());

    tokio::task::spawn_blocking(move || {
        let mut browser = launcher.launch()?;
        navigator.scrape(&mut browser)
    })
    .await
    .map_err(|e| AppError::Browser(format!("scrape task failed: {e}")))?
}
