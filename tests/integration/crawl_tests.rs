//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the storefront API and test
//! the full pagination/checkpoint/resume cycle end-to-end.

use gleaner::config::Config;
use gleaner::crawler::{Coordinator, StopReason};
use gleaner::storage::{CsvStore, MemoryStore, ReviewStore};
use std::collections::HashSet;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: &str = "3159330";

/// Creates a test configuration pointed at a mock server, with all
/// deliberate throttling sleeps zeroed out
fn test_config(base_url: &str, checkpoint_path: &str, output_path: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.app_id = APP_ID.to_string();
    config.api.page_size = 50;
    config.crawl.day_ranges = vec![7];
    config.crawl.filters = vec!["all".to_string()];
    config.crawl.round_delay = 0;
    config.crawl.retry_delay_base = 0;
    config.crawl.request_timeout = 5;
    config.output.checkpoint_path = checkpoint_path.to_string();
    config.output.output_path = output_path.to_string();
    config
}

/// Builds a JSON page body with distinct review ids from the given range
fn page_body(ids: std::ops::Range<u32>, cursor: &str) -> String {
    let reviews: Vec<_> = ids
        .map(|i| {
            serde_json::json!({
                "recommendationid": i.to_string(),
                "review": format!("review {}", i),
                "votes_up": 1,
                "votes_funny": 0,
                "comment_count": 0,
                "author": {
                    "steamid": format!("76561198{:09}", i),
                    "playtime_forever": 600,
                    "playtime_last_two_weeks": 30
                },
                "language": "english",
                "timestamp_created": 1_742_400_000,
                "timestamp_updated": 1_742_400_000,
                "weighted_vote_score": "0.5",
                "written_during_early_access": false
            })
        })
        .collect();
    serde_json::json!({ "success": 1, "reviews": reviews, "cursor": cursor }).to_string()
}

fn json_page(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "application/json")
}

/// Mounts one page keyed on the cursor query parameter
async fn mount_page(server: &MockServer, cursor: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("cursor", cursor))
        .respond_with(json_page(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_full_pages_then_cap() {
    // The worked example: two pages of 50 distinct reviews, a review cap
    // of 100, one combination. Exactly one mid-crawl checkpoint (after
    // the first page crosses the interval boundary) plus the final
    // unconditional save.
    let server = MockServer::start().await;
    mount_page(&server, "*", page_body(0..50, "c1")).await;
    mount_page(&server, "c1", page_body(50..100, "c2")).await;
    mount_page(&server, "c2", page_body(100..100, "")).await;

    let mut config = test_config(&server.uri(), "unused", "unused");
    config.crawl.max_reviews = 100;

    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.collected().len(), 100);
    // Dedup index mirrors the review list exactly.
    let ids: HashSet<_> = coordinator
        .collected()
        .reviews()
        .iter()
        .map(|r| r.review_id.clone())
        .collect();
    assert_eq!(ids.len(), 100);
    for id in &ids {
        assert!(coordinator.collected().contains(id));
    }

    // One checkpoint write plus one final write.
    assert_eq!(coordinator.store().save_count(), 2);

    let stats = coordinator.statistics();
    assert_eq!(stats.combinations.len(), 1);
    assert_eq!(stats.combinations[0].1.stop, StopReason::CapReached);
}

#[tokio::test]
async fn test_empty_first_page_is_normal_termination() {
    let server = MockServer::start().await;
    mount_page(&server, "*", page_body(0..0, "")).await;

    let config = test_config(&server.uri(), "unused", "unused");
    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert!(coordinator.collected().is_empty());
    // Only the unconditional final save.
    assert_eq!(coordinator.store().save_count(), 1);
    assert_eq!(
        coordinator.statistics().combinations[0].1.stop,
        StopReason::NoMoreReviews
    );
}

#[tokio::test]
async fn test_stall_detector_stops_after_fifth_duplicate_page() {
    // Fresh cursor every round, but the same 10 reviews: the
    // duplicate-content trap must fire exactly after the 5th zero-new
    // page, never earlier.
    let server = MockServer::start().await;
    mount_page(&server, "*", page_body(0..10, "c1")).await;
    for (cursor, next) in [
        ("c1", "c2"),
        ("c2", "c3"),
        ("c3", "c4"),
        ("c4", "c5"),
        ("c5", "c6"),
    ] {
        mount_page(&server, cursor, page_body(0..10, next)).await;
    }
    // The trap must stop the loop before this cursor is ever requested.
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("cursor", "c6"))
        .respond_with(json_page(page_body(0..10, "c7")))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), "unused", "unused");
    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.collected().len(), 10);
    let outcome = &coordinator.statistics().combinations[0].1;
    assert_eq!(outcome.stop, StopReason::Stalled);
    // One productive round plus exactly five stalled ones.
    assert_eq!(outcome.rounds, 6);
}

#[tokio::test]
async fn test_cursor_trap_fires_independent_of_content() {
    // The server keeps returning fresh reviews but an unmoving cursor:
    // the cursor trap must stop the combination after the 3rd repeated
    // round even though every page contributes new ids.
    let server = MockServer::start().await;
    mount_page(&server, "*", page_body(0..10, "stuck")).await;
    for ids in [10..20, 20..30, 30..40, 40..50] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", APP_ID)))
            .and(query_param("cursor", "stuck"))
            .respond_with(json_page(page_body(ids, "stuck")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }

    let config = test_config(&server.uri(), "unused", "unused");
    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let outcome = &coordinator.statistics().combinations[0].1;
    assert_eq!(outcome.stop, StopReason::CursorStuck);
    assert_eq!(outcome.rounds, 5);
    // Content kept flowing the whole time; the stall detector never saw
    // a zero-new round.
    assert_eq!(coordinator.collected().len(), 50);
}

#[tokio::test]
async fn test_fetch_exhaustion_aborts_only_that_combination() {
    // First filter always fails with 500; the crawl must abandon it after
    // the full retry budget and still harvest the second filter.
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "recent"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "all"))
        .and(query_param("cursor", "*"))
        .respond_with(json_page(page_body(0..5, "c1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "all"))
        .and(query_param("cursor", "c1"))
        .respond_with(json_page(page_body(0..0, "")))
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), "unused", "unused");
    config.crawl.filters = vec!["recent".to_string(), "all".to_string()];

    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    let stats = coordinator.statistics();
    assert_eq!(stats.combinations.len(), 2);
    assert_eq!(stats.combinations[0].1.stop, StopReason::FetchExhausted);
    assert_eq!(stats.combinations[1].1.stop, StopReason::NoMoreReviews);
    assert_eq!(coordinator.collected().len(), 5);
}

#[tokio::test]
async fn test_global_cap_skips_remaining_combinations() {
    // Cap of 30 with pages of 20: the crossing round's merge completes
    // (40 reviews, never truncated mid-merge) and the second day-range is
    // never requested.
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("day_range", "7"))
        .and(query_param("cursor", "*"))
        .respond_with(json_page(page_body(0..20, "c1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("day_range", "7"))
        .and(query_param("cursor", "c1"))
        .respond_with(json_page(page_body(20..40, "c2")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("day_range", "30"))
        .respond_with(json_page(page_body(100..120, "x")))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), "unused", "unused");
    config.crawl.day_ranges = vec![7, 30];
    config.crawl.max_reviews = 30;

    let mut coordinator =
        Coordinator::new(config, MemoryStore::new(), true).expect("Failed to create coordinator");
    coordinator.run().await.expect("Harvest failed");

    assert_eq!(coordinator.collected().len(), 40);
    let stats = coordinator.statistics();
    assert_eq!(stats.combinations.len(), 1);
    assert_eq!(stats.combinations[0].1.stop, StopReason::CapReached);
    assert_eq!(stats.skipped_combinations, 1);
}

#[tokio::test]
async fn test_resume_yields_same_membership_as_continuous_run() {
    // Three pages of 50 then the end of data. A run capped at 80 stops
    // mid-sequence and checkpoints; a resumed run re-walks the
    // combination from the sentinel cursor, deduplicates the overlap, and
    // ends with the same membership as one continuous run.
    async fn mount_sequence(server: &MockServer) {
        mount_page(server, "*", page_body(0..50, "c1")).await;
        mount_page(server, "c1", page_body(50..100, "c2")).await;
        mount_page(server, "c2", page_body(100..150, "c3")).await;
        mount_page(server, "c3", page_body(0..0, "")).await;
    }

    fn membership(store: &CsvStore) -> HashSet<String> {
        store
            .load()
            .expect("Failed to read file")
            .expect("File missing")
            .into_iter()
            .map(|r| r.review_id)
            .collect()
    }

    let server = MockServer::start().await;
    mount_sequence(&server).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let continuous_cp = dir.path().join("continuous.csv");
    let split_cp = dir.path().join("split.csv");

    // Continuous reference run.
    let config = test_config(
        &server.uri(),
        continuous_cp.to_str().unwrap(),
        dir.path().join("continuous_out.csv").to_str().unwrap(),
    );
    let store = CsvStore::new(&continuous_cp);
    let mut coordinator = Coordinator::new(config, store, true).expect("coordinator");
    coordinator.run().await.expect("Continuous run failed");
    assert_eq!(coordinator.collected().len(), 150);

    // First half of the split run: capped at 80, so it stops after the
    // second page and checkpoints 100 reviews.
    let mut config = test_config(
        &server.uri(),
        split_cp.to_str().unwrap(),
        dir.path().join("split_out.csv").to_str().unwrap(),
    );
    config.crawl.max_reviews = 80;
    let store = CsvStore::new(&split_cp);
    let mut first = Coordinator::new(config.clone(), store, true).expect("coordinator");
    first.run().await.expect("First half failed");
    assert_eq!(first.collected().len(), 100);

    // Second half: resume from the checkpoint with the cap lifted.
    config.crawl.max_reviews = 20_000;
    let store = CsvStore::new(&split_cp);
    let mut second = Coordinator::new(config, store, false).expect("coordinator");
    second.run().await.expect("Second half failed");
    assert_eq!(second.collected().len(), 150);

    let continuous = membership(&CsvStore::new(&continuous_cp));
    let split = membership(&CsvStore::new(&split_cp));
    assert_eq!(continuous.len(), 150);
    assert_eq!(continuous, split);
}

#[tokio::test]
async fn test_checkpoint_file_has_one_row_per_unique_review() {
    // End-to-end through the CSV store: later combinations re-surface
    // reviews from earlier ones, and the file still carries each id once.
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "recent"))
        .and(query_param("cursor", "*"))
        .respond_with(json_page(page_body(0..30, "r1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "recent"))
        .and(query_param("cursor", "r1"))
        .respond_with(json_page(page_body(0..0, "")))
        .mount(&server)
        .await;

    // Overlapping ids 20..30 plus ten new ones.
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "all"))
        .and(query_param("cursor", "*"))
        .respond_with(json_page(page_body(20..40, "a1")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{}", APP_ID)))
        .and(query_param("filter", "all"))
        .and(query_param("cursor", "a1"))
        .respond_with(json_page(page_body(0..0, "")))
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let checkpoint = dir.path().join("cp.csv");
    let mut config = test_config(
        &server.uri(),
        checkpoint.to_str().unwrap(),
        dir.path().join("out.csv").to_str().unwrap(),
    );
    config.crawl.filters = vec!["recent".to_string(), "all".to_string()];

    let store = CsvStore::new(&checkpoint);
    let mut coordinator = Coordinator::new(config, store, true).expect("coordinator");
    coordinator.run().await.expect("Harvest failed");

    let rows = CsvStore::new(&checkpoint)
        .load()
        .expect("Failed to read checkpoint")
        .expect("Checkpoint missing");
    assert_eq!(rows.len(), 40);
    let ids: HashSet<_> = rows.iter().map(|r| r.review_id.clone()).collect();
    assert_eq!(ids.len(), rows.len());
}
