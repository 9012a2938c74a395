/// Duplicate-content trap detector
///
/// Counts consecutive rounds that merged zero new reviews. The server can
/// keep returning status-success pages whose entries are all already
/// known; after `limit` such rounds the combination is declared stalled.
/// Kept as its own counter, separate from the cursor-repetition tracker,
/// because the two traps fire independently and at different thresholds.
#[derive(Debug, Clone)]
pub struct StallTracker {
    stall_count: u32,
    limit: u32,
}

impl StallTracker {
    pub fn new(limit: u32) -> Self {
        Self {
            stall_count: 0,
            limit,
        }
    }

    /// Observes one round's new-review count.
    ///
    /// Zero increments the stall count, anything else resets it.
    /// Returns true once the stall limit is reached.
    pub fn observe(&mut self, new_count: usize) -> bool {
        if new_count == 0 {
            self.stall_count += 1;
        } else {
            self.stall_count = 0;
        }
        self.stall_count >= self.limit
    }

    pub fn stall_count(&self) -> u32 {
        self.stall_count
    }
}
