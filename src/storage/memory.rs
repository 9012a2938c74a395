use crate::review::Review;
use crate::storage::{ReviewStore, StorageResult};

/// In-memory store, used by tests to observe checkpoint writes
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Vec<Review>>,
    save_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store as if a checkpoint already existed
    pub fn with_snapshot(reviews: Vec<Review>) -> Self {
        Self {
            snapshot: Some(reviews),
            save_count: 0,
        }
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    pub fn snapshot(&self) -> Option<&[Review]> {
        self.snapshot.as_deref()
    }
}

impl ReviewStore for MemoryStore {
    fn save(&mut self, reviews: &[Review]) -> StorageResult<()> {
        self.snapshot = Some(reviews.to_vec());
        self.save_count += 1;
        Ok(())
    }

    fn load(&self) -> StorageResult<Option<Vec<Review>>> {
        Ok(self.snapshot.clone())
    }
}
