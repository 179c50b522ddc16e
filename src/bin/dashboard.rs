use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use market_scraper::api::{router, ApiState};
use market_scraper::config::Config;
use market_scraper::db;
use market_scraper::error::Result;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let pool = db::connect(&cfg).await?;

    let app = router(ApiState { pool });
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Dashboard API listening on {bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
