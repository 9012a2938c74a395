//! Final output assembly: run statistics and the output CSV.

mod stats;

pub use stats::{print_statistics, CrawlStatistics};
