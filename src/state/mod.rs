//! Crawl state: pagination cursors, trap detectors, and the accumulated
//! review set with its dedup index.

mod collection;
mod cursor;
mod stall;

pub use collection::ReviewSet;
pub use cursor::{round_delay, CursorState, CursorTracker, FIRST_PAGE};
pub use stall::StallTracker;
