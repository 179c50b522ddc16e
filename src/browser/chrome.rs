use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::browser::{BrowserLauncher, TableBrowser};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::types::RawTableRow;

/// Page elements the scraper relies on.
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub table_id_fragment: String,
    pub next_button_id: String,
    pub disabled_class: String,
    pub current_page_selector: String,
}

impl PageSelectors {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            table_id_fragment: cfg.table_id_fragment.clone(),
            next_button_id: cfg.next_button_id.clone(),
            disabled_class: cfg.disabled_class.clone(),
            current_page_selector: cfg.current_page_selector.clone(),
        }
    }

    /// CSS selector matching the table by partial id.
    pub fn table_selector(&self) -> String {
        format!("table[id*=\"{}\"]", self.table_id_fragment)
    }
}

#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    headless: bool,
    chrome_path: Option<PathBuf>,
    selectors: PageSelectors,
}

impl ChromeLauncher {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            headless: cfg.headless,
            chrome_path: cfg.chrome_path.as_ref().map(PathBuf::from),
            selectors: PageSelectors::from_config(cfg),
        }
    }
}

impl BrowserLauncher for ChromeLauncher {
    type Browser = ChromeBrowser;

    fn launch(&self) -> Result<ChromeBrowser> {
        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .path(self.chrome_path.clone())
            .build()
            .map_err(|e| AppError::Browser(format!("invalid launch options: {e}")))?;

        let browser = Browser::new(options).map_err(browser_err)?;
        let tab = browser.new_tab().map_err(browser_err)?;
        info!(headless = self.headless, "Chrome session started");

        Ok(ChromeBrowser {
            _browser: browser,
            tab,
            selectors: self.selectors.clone(),
        })
    }
}

/// A live Chrome session. Dropping it shuts the browser process down.
pub struct ChromeBrowser {
    _browser: Browser,
    tab: Arc<Tab>,
    selectors: PageSelectors,
}

impl ChromeBrowser {
    fn eval(&self, script: &str) -> Result<serde_json::Value> {
        let object = self.tab.evaluate(script, false).map_err(browser_err)?;
        Ok(object.value.unwrap_or(serde_json::Value::Null))
    }

    fn next_button_expr(&self) -> Result<String> {
        Ok(format!(
            "document.getElementById({})",
            serde_json::to_string(&self.selectors.next_button_id)?
        ))
    }
}

impl TableBrowser for ChromeBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        debug!("Opening {url}");
        self.tab.navigate_to(url).map_err(browser_err)?;
        self.tab.wait_until_navigated().map_err(browser_err)?;
        Ok(())
    }

    fn wait_for_table(&mut self, timeout: Duration) -> Result<bool> {
        let selector = self.selectors.table_selector();
        Ok(self
            .tab
            .wait_for_element_with_custom_timeout(&selector, timeout)
            .is_ok())
    }

    fn current_page_label(&mut self) -> Result<Option<String>> {
        let script = format!(
            "(() => {{ const a = document.querySelector({}); return a ? a.textContent.trim() : null; }})()",
            serde_json::to_string(&self.selectors.current_page_selector)?
        );
        Ok(self.eval(&script)?.as_str().map(str::to_string))
    }

    fn current_rows(&mut self) -> Result<Vec<RawTableRow>> {
        // Serialised in the page so the whole table crosses the protocol once.
        let script = format!(
            "(() => {{ \
               const table = document.querySelector({}); \
               if (!table) return null; \
               return JSON.stringify(Array.from(table.querySelectorAll('tr')).map(tr => \
                 Array.from(tr.querySelectorAll('td')).map(td => ({{ text: td.innerText, html: td.innerHTML }})))); \
             }})()",
            serde_json::to_string(&self.selectors.table_selector())?
        );
        match self.eval(&script)? {
            serde_json::Value::String(json) => Ok(serde_json::from_str(&json)?),
            _ => Err(AppError::ScrapeUnavailable(
                "table disappeared while reading rows".to_string(),
            )),
        }
    }

    fn is_next_disabled(&mut self) -> Result<bool> {
        let script = format!(
            "(() => {{ const b = {}; return b ? b.className : null; }})()",
            self.next_button_expr()?
        );
        match self.eval(&script)?.as_str() {
            Some(class) => Ok(class
                .split_whitespace()
                .any(|c| c == self.selectors.disabled_class)),
            None => Err(AppError::Browser(format!(
                "next control #{} not found",
                self.selectors.next_button_id
            ))),
        }
    }

    fn click_next(&mut self) -> Result<()> {
        // Script click: the control is often covered by an overlay.
        let script = format!(
            "(() => {{ const b = {}; if (!b) return false; b.click(); return true; }})()",
            self.next_button_expr()?
        );
        match self.eval(&script)?.as_bool() {
            Some(true) => Ok(()),
            _ => Err(AppError::Browser(format!(
                "next control #{} could not be clicked",
                self.selectors.next_button_id
            ))),
        }
    }
}

fn browser_err(e: impl std::fmt::Display) -> AppError {
    AppError::Browser(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_selector_matches_partial_id() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        let selectors = PageSelectors::from_config(&cfg);
        assert_eq!(selectors.table_selector(), "table[id*=\"ndsomEntityTable\"]");
    }
}
