//! Crawl coordinator - main harvest orchestration logic
//!
//! Owns the accumulated review set and the checkpoint store, enumerates
//! the parameter combinations in fixed nested order, and runs the
//! pagination loop for each. The review set and dedup index live here and
//! are passed into each combination's run; there are no process-wide
//! accumulators.

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::pagination::{run_combination, StopReason};
use crate::output::CrawlStatistics;
use crate::state::ReviewSet;
use crate::storage::{CsvStore, ReviewStore};
use crate::GleanerError;
use reqwest::Client;
use std::path::Path;

/// Main harvest coordinator
pub struct Coordinator<S: ReviewStore> {
    config: Config,
    client: Client,
    store: S,
    collected: ReviewSet,
    stats: CrawlStatistics,
}

impl<S: ReviewStore> Coordinator<S> {
    /// Creates a coordinator, seeding the review set from the store's
    /// checkpoint unless `fresh` is set
    ///
    /// Loading rebuilds the dedup index from the checkpointed ids, so a
    /// resumed run never re-counts a review it already holds.
    pub fn new(config: Config, store: S, fresh: bool) -> Result<Self, GleanerError> {
        let client = build_http_client(&config.crawl)?;

        let collected = if fresh {
            tracing::info!("Starting fresh harvest (ignoring any checkpoint)");
            ReviewSet::new()
        } else {
            match store.load()? {
                Some(reviews) => {
                    let set = ReviewSet::from_reviews(reviews);
                    tracing::info!("Loaded checkpoint with {} reviews", set.len());
                    set
                }
                None => {
                    tracing::info!("No checkpoint found, starting empty");
                    ReviewSet::new()
                }
            }
        };

        Ok(Self {
            config,
            client,
            store,
            collected,
            stats: CrawlStatistics::default(),
        })
    }

    /// Runs the harvest across all parameter combinations
    ///
    /// Each combination gets fresh cursor state and trap detectors and is
    /// re-run from its first page on resume; dedup keeps that idempotent.
    /// A crawl-wide stop (review cap) skips every remaining combination.
    /// The final checkpoint write is unconditional, whatever stop
    /// condition ended the crawl.
    pub async fn run(&mut self) -> Result<(), GleanerError> {
        let combinations = self.config.combinations();
        let total = combinations.len();
        tracing::info!(
            "Harvesting app {} across {} parameter combinations",
            self.config.api.app_id,
            total
        );

        let mut capped = false;
        for (index, combination) in combinations.into_iter().enumerate() {
            if capped {
                self.stats.skipped_combinations = total - index;
                break;
            }

            tracing::info!("Requesting with {}", combination);
            let outcome = run_combination(
                &self.client,
                &self.config,
                &combination,
                &mut self.collected,
                &mut self.store,
            )
            .await?;

            capped = outcome.stop == StopReason::CapReached;
            self.stats.record(combination, outcome);
        }

        // Unconditional final checkpoint.
        self.store.save(self.collected.reviews())?;
        tracing::info!(
            "Final checkpoint saved: {} reviews [{}]",
            self.collected.len(),
            chrono::Local::now().format("%Y%m%d_%H%M")
        );

        self.stats.total_reviews = self.collected.len();
        Ok(())
    }

    pub fn collected(&self) -> &ReviewSet {
        &self.collected
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }
}

/// Runs a complete harvest with CSV-backed checkpointing
///
/// This is the binary's entry point into the crawl: it wires the
/// checkpoint store to the configured path, runs the coordinator, writes
/// the final output file (same schema as the checkpoint), and prints the
/// run summary.
pub async fn run_crawl(config: Config, fresh: bool) -> Result<(), GleanerError> {
    let store = CsvStore::new(Path::new(&config.output.checkpoint_path));
    let output_path = config.output.output_path.clone();

    let mut coordinator = Coordinator::new(config, store, fresh)?;
    coordinator.run().await?;

    let mut output = CsvStore::new(Path::new(&output_path));
    output.save(coordinator.collected().reviews())?;
    tracing::info!(
        "Final saved: {} reviews to '{}' [{}]",
        coordinator.collected().len(),
        output_path,
        chrono::Local::now().format("%Y%m%d_%H%M")
    );

    crate::output::print_statistics(coordinator.statistics());
    Ok(())
}
