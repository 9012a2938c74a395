//! Checkpoint and output persistence
//!
//! The checkpoint file is the only durable state: a resumed run rebuilds
//! everything else (the dedup index in particular) from it.

mod csv_store;
mod memory;
mod traits;

pub use csv_store::CsvStore;
pub use memory::MemoryStore;
pub use traits::{ReviewStore, StorageError, StorageResult};
