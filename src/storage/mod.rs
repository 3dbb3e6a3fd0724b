//! Storage Module
//!
//! Persistent storage layer: one sorted snapshot file per store.
//!
//! ## Responsibilities
//! - Persist the complete mapping in sorted order
//! - Replace the previous snapshot atomically (temp file + rename)
//! - Detect corruption (magic, version, CRC32, ordering) on load
//!
//! Every durable mutation rewrites the whole snapshot. Cost scales with the
//! store size, not the size of the change, which is why a `WriteBatch`
//! amortizes one persist over many operations.

mod manager;
mod snapshot;

pub use manager::SnapshotManager;
pub use snapshot::{SnapshotIterator, SnapshotMeta, SnapshotReader, SnapshotWriter};
