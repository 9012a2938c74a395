//! Cursor pagination loop for one parameter combination
//!
//! Drives repeated fetches, merging each page into the shared review set,
//! until one of the stop conditions fires. Stop precedence after each
//! merge: stall trap, then the global cap, then the cursor-repetition
//! trap. The cap check runs after the merge completes, so a round is
//! never truncated mid-merge.

use crate::config::{Combination, Config};
use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use crate::state::{round_delay, CursorState, CursorTracker, ReviewSet, StallTracker};
use crate::storage::{ReviewStore, StorageResult};
use reqwest::Client;

/// Why a combination's pagination loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Fetch retry budget exhausted; the combination is abandoned
    FetchExhausted,
    /// The server returned a page with zero entries, normal end-of-data
    NoMoreReviews,
    /// Duplicate-content trap: too many consecutive rounds with no new ids
    Stalled,
    /// Cursor-stuck trap: the cursor stopped moving across rounds
    CursorStuck,
    /// Global review cap reached; stops the entire crawl, not just this
    /// combination
    CapReached,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            StopReason::FetchExhausted => "fetch retries exhausted",
            StopReason::NoMoreReviews => "no more reviews",
            StopReason::Stalled => "duplicate-content stall",
            StopReason::CursorStuck => "cursor stuck",
            StopReason::CapReached => "review cap reached",
        };
        f.write_str(text)
    }
}

/// Summary of one combination's pagination run
#[derive(Debug, Clone)]
pub struct CombinationOutcome {
    pub stop: StopReason,
    /// Rounds fetched, including the terminating one
    pub rounds: u32,
    /// Reviews this combination contributed to the set
    pub new_reviews: usize,
}

/// Runs the pagination loop for one combination to completion
///
/// Trap detectors and cursor state are created fresh here; nothing
/// carries over between combinations. Checkpoint writes go through the
/// store whenever the running total crosses a checkpoint boundary; a
/// store failure is fatal and propagates.
pub async fn run_combination<S: ReviewStore>(
    client: &Client,
    config: &Config,
    combination: &Combination,
    collected: &mut ReviewSet,
    store: &mut S,
) -> StorageResult<CombinationOutcome> {
    let mut cursor = CursorState::new();
    let mut stall = StallTracker::new(config.crawl.stall_limit);
    let mut cursor_trap = CursorTracker::new(config.crawl.cursor_repeat_limit);
    let mut rounds = 0u32;
    let mut new_reviews = 0usize;

    let stop = loop {
        rounds += 1;

        let page = match fetch_page(client, &config.api, &config.crawl, combination, &cursor.current)
            .await
        {
            FetchOutcome::Page(page) => page,
            FetchOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                tracing::warn!(
                    "Abandoning {} after {} failed attempts: {}",
                    combination,
                    attempts,
                    last_error
                );
                break StopReason::FetchExhausted;
            }
        };

        if page.entries.is_empty() {
            tracing::info!("No more reviews for {}", combination);
            break StopReason::NoMoreReviews;
        }

        let new_count = collected.merge_page(&page.entries);
        new_reviews += new_count;
        tracing::info!(
            "Collected {} reviews so far... (+{} new)",
            collected.len(),
            new_count
        );

        if stall.observe(new_count) {
            tracing::info!(
                "No new reviews for {} rounds on {}. Stopping.",
                stall.stall_count(),
                combination
            );
            break StopReason::Stalled;
        }

        if collected.len() >= config.crawl.max_reviews {
            tracing::info!(
                "Reached review cap of {}. Stopping the crawl.",
                config.crawl.max_reviews
            );
            break StopReason::CapReached;
        }

        if cursor_trap.observe(&cursor.current, cursor.previous.as_deref()) {
            tracing::info!(
                "Cursor unchanged for {} rounds on {}. Stopping.",
                cursor_trap.repeat_count(),
                combination
            );
            break StopReason::CursorStuck;
        }

        if collected.checkpoint_due(new_count, config.crawl.checkpoint_interval) {
            store.save(collected.reviews())?;
            tracing::info!("Checkpoint saved at {} reviews", collected.len());
        }

        cursor.advance(&page.cursor);
        tokio::time::sleep(round_delay(config.crawl.round_delay)).await;
    };

    tracing::debug!(
        "Combination {} done after {} rounds ({}): +{} reviews",
        combination,
        rounds,
        stop,
        new_reviews
    );

    Ok(CombinationOutcome {
        stop,
        rounds,
        new_reviews,
    })
}
