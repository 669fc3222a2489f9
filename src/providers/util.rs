use anyhow::{Context, Error, Result};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = "tsquotes/0.1";

/// Builds the HTTP client shared by a provider.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Retries an async request with a fixed delay between attempts.
///
/// Total runs are `1 + retries`. The last error is returned when every
/// attempt fails.
pub async fn with_retry<F, Fut, T>(mut operation: F, retries: usize, delay_ms: u64) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let mut attempt = 1;
    loop {
        match operation().await.map_err(Error::from) {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries {
                    return Err(err);
                }
                debug!("Attempt {}/{} failed: {}. Retrying...", attempt, retries, err);
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
