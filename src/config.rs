use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const TARGET_URL: &str = "https://www.ccilindia.com/web/ccil/rbi-nds-om1";

/// Partial id of the market table; the site suffixes it with a portlet id.
pub const TABLE_ID_FRAGMENT: &str = "ndsomEntityTable";
pub const NEXT_BUTTON_ID: &str = "ndsomEntityTable_next";
pub const DISABLED_CLASS: &str = "disabled";
pub const CURRENT_PAGE_SELECTOR: &str = "a.paginate_button.current";

/// Bounded wait for the table to become present (seconds).
pub const TABLE_WAIT_SECS: u64 = 5;

/// Pause after clicking "next" so the table can redraw (milliseconds).
pub const PAGE_SETTLE_MS: u64 = 2000;

/// Upper bound on pages visited in one scrape, in case "next" never disables.
pub const MAX_PAGES: usize = 500;

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY_SECS: u64 = 5;

pub const API_PORT: u16 = 8050;

/// Which columns decide whether a scraped row differs from the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeDetection {
    /// Only Trades is compared.
    TradesOnly,
    /// Trades, TTA, Open, High, Low, LTP and LTY are compared.
    #[default]
    AllFields,
}

impl FromStr for ChangeDetection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "trades_only" | "trades" => Ok(ChangeDetection::TradesOnly),
            "all_fields" | "all" => Ok(ChangeDetection::AllFields),
            other => Err(AppError::Config(format!(
                "CHANGE_DETECTION must be `all_fields` or `trades_only`, got `{other}`"
            ))),
        }
    }
}

impl fmt::Display for ChangeDetection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeDetection::TradesOnly => "trades_only",
            ChangeDetection::AllFields => "all_fields",
        };
        write!(f, "{s}")
    }
}

/// How changed rows reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Every changed row is a new entry; history accumulates per security.
    #[default]
    Append,
    /// Existing rows for the security are overwritten and re-stamped.
    Upsert,
}

impl FromStr for WriteMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(WriteMode::Append),
            "upsert" => Ok(WriteMode::Upsert),
            other => Err(AppError::Config(format!(
                "WRITE_MODE must be `append` or `upsert`, got `{other}`"
            ))),
        }
    }
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WriteMode::Append => "append",
            WriteMode::Upsert => "upsert",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// SQLite file backing the RegularMarket table (DB_PATH).
    /// Checked when connecting, not here.
    pub db_path: Option<String>,
    pub target_url: String,
    pub table_id_fragment: String,
    pub next_button_id: String,
    pub disabled_class: String,
    pub current_page_selector: String,
    pub table_wait: Duration,
    pub page_settle: Duration,
    pub max_pages: usize,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub change_detection: ChangeDetection,
    pub write_mode: WriteMode,
    /// Chrome/Chromium binary (CHROME_PATH). Auto-detected when unset.
    pub chrome_path: Option<String>,
    pub headless: bool,
    pub api_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            db_path: var("DB_PATH"),
            target_url: var("TARGET_URL").unwrap_or_else(|| TARGET_URL.to_string()),
            table_id_fragment: var("TABLE_ID_FRAGMENT")
                .unwrap_or_else(|| TABLE_ID_FRAGMENT.to_string()),
            next_button_id: var("NEXT_BUTTON_ID").unwrap_or_else(|| NEXT_BUTTON_ID.to_string()),
            disabled_class: var("DISABLED_CLASS").unwrap_or_else(|| DISABLED_CLASS.to_string()),
            current_page_selector: var("CURRENT_PAGE_SELECTOR")
                .unwrap_or_else(|| CURRENT_PAGE_SELECTOR.to_string()),
            table_wait: Duration::from_secs(parse_var(&var, "TABLE_WAIT_SECS", TABLE_WAIT_SECS)?),
            page_settle: Duration::from_millis(parse_var(&var, "PAGE_SETTLE_MS", PAGE_SETTLE_MS)?),
            max_pages: parse_var(&var, "MAX_PAGES", MAX_PAGES)?,
            max_retries: parse_var(&var, "MAX_RETRIES", MAX_RETRIES)?,
            retry_delay: Duration::from_secs(parse_var(&var, "RETRY_DELAY_SECS", RETRY_DELAY_SECS)?),
            change_detection: parse_var(&var, "CHANGE_DETECTION", ChangeDetection::default())?,
            write_mode: parse_var(&var, "WRITE_MODE", WriteMode::default())?,
            chrome_path: var("CHROME_PATH"),
            headless: parse_var(&var, "HEADLESS", true)?,
            api_port: parse_var(&var, "API_PORT", API_PORT)?,
        })
    }
}

fn parse_var<T, V>(var: &V, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value `{raw}`"))),
    }
}
