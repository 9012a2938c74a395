use std::time::Duration;

/// Sentinel cursor value meaning "first page"
pub const FIRST_PAGE: &str = "*";

/// Per-combination pagination position
///
/// Fresh state is created for every parameter combination; cursors never
/// carry over between combinations.
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Cursor to send with the next fetch
    pub current: String,
    /// Cursor that was sent with the previous round's fetch
    pub previous: Option<String>,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            current: FIRST_PAGE.to_string(),
            previous: None,
        }
    }

    /// Advances to the cursor returned by the server
    ///
    /// An empty `next` is a valid value: the server has no further pages
    /// and the following round's empty response ends the combination.
    pub fn advance(&mut self, next: &str) {
        self.previous = Some(std::mem::replace(&mut self.current, next.to_string()));
    }
}

impl Default for CursorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor-repetition trap detector
///
/// Counts consecutive rounds in which the server handed back an unchanged
/// cursor while still reporting success. This is tracked independently of
/// the duplicate-content stall detector because the two upstream failure
/// modes occur independently: the server can move the cursor while
/// serving stale content, or freeze the cursor while serving content.
#[derive(Debug, Clone)]
pub struct CursorTracker {
    repeat_count: u32,
    limit: u32,
}

impl CursorTracker {
    pub fn new(limit: u32) -> Self {
        Self {
            repeat_count: 0,
            limit,
        }
    }

    /// Observes one round's cursor against the previous round's cursor.
    ///
    /// The comparison point is the cursor used *this* round versus the one
    /// used the round before, evaluated before the response cursor is
    /// assigned; the first round can therefore never increment the count.
    /// Returns true once the repeat limit is reached.
    pub fn observe(&mut self, current: &str, previous: Option<&str>) -> bool {
        if previous == Some(current) {
            self.repeat_count += 1;
        } else {
            self.repeat_count = 0;
        }
        self.repeat_count >= self.limit
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }
}

/// Fixed pause between successful rounds, deliberate rate-limit throttling
pub fn round_delay(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
