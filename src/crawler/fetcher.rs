//! HTTP fetcher implementation
//!
//! One call = one page of reviews for a given parameter combination and
//! cursor, behind a bounded retry budget. Transport errors, non-success
//! statuses, and unparseable bodies are all the same retryable failure;
//! only exhausting the budget surfaces, and even that is terminal for the
//! current combination only, never for the process.

use crate::config::{ApiConfig, Combination, CrawlConfig};
use crate::review::ReviewPage;
use reqwest::Client;
use std::time::Duration;

/// Result of a page fetch, consumed by an explicit match in the
/// pagination loop rather than loop-exhaustion control flow
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched and parsed a page (possibly empty)
    Page(ReviewPage),

    /// Every attempt in the retry budget failed
    Exhausted {
        /// Attempts made before giving up
        attempts: u32,
        /// Description of the last failure
        last_error: String,
    },
}

/// Builds the HTTP client used for every request of the run
pub fn build_http_client(crawl: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let user_agent = format!("gleaner/{}", env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawl.request_timeout))
        .connect_timeout(Duration::from_secs(crawl.request_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one page of reviews with bounded retry
///
/// # Retry Logic
///
/// Up to `max_retries` attempts. Each failed attempt sleeps
/// `retry_delay_base + attempt_index` seconds before the next one, a
/// linear backoff that respects the remote service's implicit rate
/// limits. Failures treated identically and retried:
///
/// | Condition | Example |
/// |-----------|---------|
/// | Transport error | connection refused, timeout |
/// | Non-success status | 429, 500, 502 |
/// | Body read / JSON parse failure | truncated or non-JSON body |
pub async fn fetch_page(
    client: &Client,
    api: &ApiConfig,
    crawl: &CrawlConfig,
    combination: &Combination,
    cursor: &str,
) -> FetchOutcome {
    let url = format!("{}/{}", api.base_url.trim_end_matches('/'), api.app_id);
    let mut last_error = String::new();

    for attempt in 0..crawl.max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(crawl.retry_delay_base + u64::from(attempt - 1));
            tokio::time::sleep(delay).await;
        }

        let request = client.get(&url).query(&[
            ("json", "1".to_string()),
            ("cursor", cursor.to_string()),
            ("num_per_page", api.page_size.to_string()),
            ("day_range", combination.day_range.to_string()),
            ("filter", combination.filter.clone()),
        ]);

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    last_error = format!("HTTP {}", status.as_u16());
                    tracing::warn!("API error {} for {}. Retrying...", status, combination);
                    continue;
                }

                match response.text().await {
                    Ok(body) => match ReviewPage::from_json(&body) {
                        Ok(page) => return FetchOutcome::Page(page),
                        Err(e) => {
                            last_error = format!("Unparseable body: {}", e);
                            tracing::warn!("Bad response body for {}: {}. Retrying...", combination, e);
                        }
                    },
                    Err(e) => {
                        last_error = format!("Body read failed: {}", e);
                        tracing::warn!("Failed to read body for {}: {}. Retrying...", combination, e);
                    }
                }
            }
            Err(e) => {
                last_error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection failed".to_string()
                } else {
                    e.to_string()
                };
                tracing::warn!("Request failed for {}: {}. Retrying...", combination, last_error);
            }
        }
    }

    FetchOutcome::Exhausted {
        attempts: crawl.max_retries,
        last_error,
    }
}
