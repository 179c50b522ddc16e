pub mod api;
pub mod browser;
pub mod config;
pub mod db;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod retry;
pub mod scrape;
pub mod types;
