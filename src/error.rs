use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The table (or a control needed to reach it) never rendered.
    #[error("Scrape unavailable: {0}")]
    ScrapeUnavailable(String),

    /// Scrape finished without producing a single row.
    #[error("Scrape results are empty")]
    EmptyResult,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Write failed for {security}: {source}")]
    WriteFailure {
        security: String,
        #[source]
        source: sqlx::Error,
    },

    /// Every statement ran but the transaction did not commit.
    #[error("Commit failed for a batch of {rows} row(s): {source}")]
    CommitFailure {
        rows: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Giving up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<AppError>,
    },
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Configuration mistakes won't fix themselves between attempts.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Config(_) => false,
            AppError::RetriesExhausted { .. } => false,
            _ => true,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::StoreUnavailable(_) | AppError::Migration(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
