use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use market_scraper::browser::ChromeLauncher;
use market_scraper::config::Config;
use market_scraper::pipeline::Pipeline;
use market_scraper::retry::{run_with_retry, RetryPolicy};

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

    info!(
        url = %cfg.target_url,
        max_retries = cfg.max_retries,
        retry_delay_secs = cfg.retry_delay.as_secs(),
        detection = %cfg.change_detection,
        write_mode = %cfg.write_mode,
        "Scraper starting"
    );

    let policy = RetryPolicy::from_config(&cfg);
    let pipeline = Pipeline::new(cfg.clone(), ChromeLauncher::from_config(&cfg));

    match run_with_retry(policy, |attempt| pipeline.run_once(attempt)).await {
        Ok(summary) => {
            info!(
                written = summary.written,
                changed = summary.changed,
                scraped = summary.scraped,
                "Scrape and store complete"
            );
        }
        Err(e) => {
            error!("Fatal error: {e}");
            std::process::exit(1);
        }
    }
}
