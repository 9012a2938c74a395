use crate::review::{RawEntry, Review};
use std::collections::HashSet;

/// Accumulated review set with its deduplication index
///
/// Reviews are kept in first-seen order and only ever appended; the id
/// index never shrinks. The index is always derivable from the review
/// list alone, which is what makes the CSV checkpoint the only persisted
/// state a resumed run needs.
#[derive(Debug, Default)]
pub struct ReviewSet {
    reviews: Vec<Review>,
    seen_ids: HashSet<String>,
}

impl ReviewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a set from checkpointed reviews, reconstructing the index
    /// from their identifiers. Duplicate rows in the file collapse to one.
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let mut set = Self::new();
        for review in reviews {
            if set.seen_ids.insert(review.review_id.clone()) {
                set.reviews.push(review);
            }
        }
        set
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.seen_ids.contains(id)
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Merges one page of raw entries, returning how many were new
    ///
    /// Already-seen ids are skipped, so re-fetching the same page is
    /// idempotent. Entries without a usable id are dropped.
    pub fn merge_page(&mut self, entries: &[RawEntry]) -> usize {
        let mut new_count = 0;
        for entry in entries {
            let Some(review) = Review::from_raw(entry) else {
                tracing::debug!("Skipping review entry without a usable id");
                continue;
            };
            if self.seen_ids.contains(&review.review_id) {
                continue;
            }
            self.seen_ids.insert(review.review_id.clone());
            self.reviews.push(review);
            new_count += 1;
        }
        new_count
    }

    /// Checkpoint trigger rule: true when a checkpoint boundary was
    /// crossed within this round's additions. `total % interval` falls
    /// below `new_count` exactly when the running total passed a multiple
    /// of the interval during the round, including rounds that add more
    /// than one full interval at once.
    pub fn checkpoint_due(&self, new_count: usize, interval: usize) -> bool {
        new_count > 0 && self.reviews.len() % interval < new_count
    }
}
