//! Statistics assembly and display for a finished crawl
//!
//! The coordinator records one outcome per parameter combination; this
//! module aggregates them into a printable run summary.

use crate::config::Combination;
use crate::crawler::{CombinationOutcome, StopReason};
use std::collections::HashMap;

/// Summary of one crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Total reviews in the dataset after the run
    pub total_reviews: usize,

    /// Reviews added by this run (excludes checkpointed ones)
    pub new_reviews: usize,

    /// Combinations that actually executed, in order, with their outcomes
    pub combinations: Vec<(Combination, CombinationOutcome)>,

    /// Combinations skipped because the cap fired earlier
    pub skipped_combinations: usize,
}

impl CrawlStatistics {
    /// Records the outcome of one combination
    pub fn record(&mut self, combination: Combination, outcome: CombinationOutcome) {
        self.new_reviews += outcome.new_reviews;
        self.combinations.push((combination, outcome));
    }

    /// Count of executed combinations by stop reason
    pub fn stop_breakdown(&self) -> HashMap<StopReason, usize> {
        let mut breakdown = HashMap::new();
        for (_, outcome) in &self.combinations {
            *breakdown.entry(outcome.stop).or_insert(0) += 1;
        }
        breakdown
    }

    /// Total fetch rounds across all combinations
    pub fn total_rounds(&self) -> u32 {
        self.combinations.iter().map(|(_, o)| o.rounds).sum()
    }
}

/// Prints the run summary to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Harvest Summary ===\n");
    println!("Total reviews:      {}", stats.total_reviews);
    println!("New this run:       {}", stats.new_reviews);
    println!("Fetch rounds:       {}", stats.total_rounds());
    println!(
        "Combinations run:   {} ({} skipped)",
        stats.combinations.len(),
        stats.skipped_combinations
    );

    println!("\nPer combination:");
    for (combination, outcome) in &stats.combinations {
        println!(
            "  {} -> +{} reviews in {} rounds ({})",
            combination, outcome.new_reviews, outcome.rounds, outcome.stop
        );
    }
}
