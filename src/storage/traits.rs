//! Storage trait and error types
//!
//! Persistence failures are the one error class this crate treats as
//! fatal: silently losing accumulated work would defeat the resumability
//! guarantee, so store errors propagate all the way out.

use crate::review::Review;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint/output backends
///
/// `save` overwrites the full snapshot wholesale; `load` returns the
/// previously saved snapshot or None when no checkpoint exists yet.
pub trait ReviewStore {
    /// Persists the full review set, replacing any previous snapshot
    fn save(&mut self, reviews: &[Review]) -> StorageResult<()>;

    /// Loads the previously saved snapshot, if any
    fn load(&self) -> StorageResult<Option<Vec<Review>>>;
}
