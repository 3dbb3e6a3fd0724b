//! Snapshot Module
//!
//! Sorted, checksummed, immutable on-disk image of a store's mapping.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "OKVS" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   [KeyLen: u32][ValLen: u32][Key][Value]                │
//! │   ... repeated for each entry, strictly ascending ...   │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (8 bytes)                                        │
//! │   DataCRC: u32 (4) | Padding (4)                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian. Zero-length keys and values are legal.

mod iterator;
mod reader;
mod writer;

use std::path::PathBuf;

pub use iterator::SnapshotIterator;
pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;

// =============================================================================
// Shared Constants (used by writer, reader, iterator)
// =============================================================================

/// Magic bytes identifying an ordkv snapshot file
pub(crate) const MAGIC: &[u8; 4] = b"OKVS";

/// Current snapshot format version
pub(crate) const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8) = 14 bytes
pub(crate) const HEADER_SIZE: u64 = 14;

/// Footer size: DataCRC (4) + Padding (4) = 8 bytes
pub(crate) const FOOTER_SIZE: u64 = 8;

/// Per-entry header: KeyLen (4) + ValLen (4)
pub(crate) const ENTRY_HEADER_SIZE: usize = 8;

// =============================================================================
// Snapshot Metadata
// =============================================================================

/// Metadata describing a finished snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    /// Path the snapshot was written to
    pub path: PathBuf,
    /// Number of entries
    pub entry_count: u64,
    /// File size in bytes
    pub file_size: u64,
}

impl SnapshotMeta {
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }
}
