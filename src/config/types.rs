use serde::Deserialize;

/// Main configuration structure for Gleaner
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            crawl: CrawlConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the storefront review endpoint
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Steam application id whose reviews are harvested
    #[serde(rename = "app-id")]
    pub app_id: String,

    /// Reviews requested per page (`num_per_page`)
    #[serde(rename = "page-size")]
    pub page_size: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://store.steampowered.com/appreviews".to_string(),
            app_id: "3159330".to_string(),
            page_size: 50,
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Day-range windows enumerated by the outer crawl loop
    #[serde(rename = "day-ranges")]
    pub day_ranges: Vec<u32>,

    /// Sort filters enumerated by the inner crawl loop
    pub filters: Vec<String>,

    /// Stop the whole crawl once this many reviews are collected
    #[serde(rename = "max-reviews")]
    pub max_reviews: usize,

    /// Write a checkpoint every time the total crosses a multiple of this
    #[serde(rename = "checkpoint-interval")]
    pub checkpoint_interval: usize,

    /// Consecutive zero-new rounds before the duplicate-content trap fires
    #[serde(rename = "stall-limit")]
    pub stall_limit: u32,

    /// Consecutive unchanged-cursor rounds before the cursor trap fires
    #[serde(rename = "cursor-repeat-limit")]
    pub cursor_repeat_limit: u32,

    /// Attempts per page fetch before the combination is abandoned
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Base sleep between retry attempts (seconds); grows by one per attempt
    #[serde(rename = "retry-delay-base")]
    pub retry_delay_base: u64,

    /// Sleep between successful rounds (seconds), deliberate throttling
    #[serde(rename = "round-delay")]
    pub round_delay: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            day_ranges: vec![7, 30, 90, 180, 365, 9999],
            filters: vec![
                "recent".to_string(),
                "updated".to_string(),
                "all".to_string(),
            ],
            max_reviews: 20_000,
            checkpoint_interval: 50,
            stall_limit: 5,
            cursor_repeat_limit: 3,
            max_retries: 3,
            request_timeout: 10,
            retry_delay_base: 2,
            round_delay: 2,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the checkpoint CSV file
    #[serde(rename = "checkpoint-path")]
    pub checkpoint_path: String,

    /// Path to the final output CSV file
    #[serde(rename = "output-path")]
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: "./gleaner_checkpoint.csv".to_string(),
            output_path: "./gleaner_reviews.csv".to_string(),
        }
    }
}

/// One (day-range, filter) pair driving one pagination sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub day_range: u32,
    pub filter: String,
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day_range={}, filter='{}'", self.day_range, self.filter)
    }
}

impl Config {
    /// Enumerates parameter combinations in fixed nested order:
    /// outer day-ranges, inner filters. Later combinations may re-surface
    /// reviews collected under earlier ones; dedup tolerates that.
    pub fn combinations(&self) -> Vec<Combination> {
        let mut combos = Vec::with_capacity(self.crawl.day_ranges.len() * self.crawl.filters.len());
        for &day_range in &self.crawl.day_ranges {
            for filter in &self.crawl.filters {
                combos.push(Combination {
                    day_range,
                    filter: filter.clone(),
                });
            }
        }
        combos
    }
}
