use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero is treated as one.
    pub max_retries: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.max_retries, cfg.retry_delay)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// Run `op` until it succeeds or the policy runs out.
///
/// `op` receives the 1-based attempt number and must rebuild all of its state
/// from scratch. Any error counts as a failed attempt, except non-retryable
/// ones which are returned straight away. When every attempt fails the result
/// is `RetriesExhausted` carrying the last error.
pub async fn run_with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max = policy.attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let err = match op(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "Succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        error!(attempt, "Error during scraping or storing data: {err}");

        if !err.is_retryable() {
            error!("Error is not retryable; giving up");
            return Err(err);
        }
        if attempt >= max {
            error!("Maximum retries reached");
            return Err(AppError::RetriesExhausted { attempts: attempt, last: Box::new(err) });
        }

        warn!("Retrying... {attempt}/{max}");
        tokio::time::sleep(policy.delay).await;
    }
}
