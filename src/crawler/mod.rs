//! Crawler module: the harvest control flow
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with bounded retry and linear backoff
//! - The cursor pagination loop with its two trap detectors
//! - Overall crawl coordination and checkpointing

mod coordinator;
mod fetcher;
mod pagination;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use pagination::{run_combination, CombinationOutcome, StopReason};
