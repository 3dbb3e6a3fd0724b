//! Snapshot Reader
//!
//! Loads a snapshot file into memory and validates it before any entry is
//! handed out.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::memtable::OrderedMap;
use crate::OrdError;

use super::iterator::SnapshotIterator;
use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, VERSION};

/// Reader over a fully buffered snapshot file
pub struct SnapshotReader {
    /// Whole file contents
    pub(super) bytes: Vec<u8>,
    /// Entry count from the header
    entry_count: u64,
}

impl SnapshotReader {
    /// Open and validate a snapshot
    ///
    /// I/O failures are returned as `Io`; anything wrong with the contents
    /// (magic, version, size, checksum) as `Corrupt`.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Validate an in-memory snapshot image
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let len = bytes.len() as u64;
        if len < HEADER_SIZE + FOOTER_SIZE {
            return Err(OrdError::Corrupt(format!(
                "Snapshot too short: {} bytes",
                len
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(OrdError::Corrupt(format!(
                "Invalid snapshot magic: expected OKVS, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(OrdError::Corrupt(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let mut count = [0u8; 8];
        count.copy_from_slice(&bytes[6..HEADER_SIZE as usize]);
        let entry_count = u64::from_le_bytes(count);

        let data_end = (len - FOOTER_SIZE) as usize;
        let mut crc = [0u8; 4];
        crc.copy_from_slice(&bytes[data_end..data_end + 4]);
        let stored_crc = u32::from_le_bytes(crc);

        let actual_crc = crc32fast::hash(&bytes[HEADER_SIZE as usize..data_end]);
        if stored_crc != actual_crc {
            return Err(OrdError::Corrupt(format!(
                "Snapshot checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored_crc, actual_crc
            )));
        }

        Ok(Self { bytes, entry_count })
    }

    /// Entry count recorded in the header
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Iterate over entries in file order
    pub fn iter(&self) -> SnapshotIterator<'_> {
        let data_end = self.bytes.len() - FOOTER_SIZE as usize;
        SnapshotIterator::new(&self.bytes[HEADER_SIZE as usize..data_end])
    }

    /// Decode every entry into an ordered map
    ///
    /// Also checks what the checksum cannot: keys strictly ascending and the
    /// entry count agreeing with the header.
    pub fn into_map(self) -> Result<OrderedMap> {
        let mut map = OrderedMap::new();
        let mut last_key: Option<Vec<u8>> = None;

        for entry in self.iter() {
            let (key, value) = entry?;
            if let Some(last) = &last_key {
                if key <= *last {
                    return Err(OrdError::Corrupt(format!(
                        "Snapshot keys out of order: {:?} after {:?}",
                        key, last
                    )));
                }
            }
            last_key = Some(key.clone());
            map.insert(key, value);
        }

        if map.len() as u64 != self.entry_count {
            return Err(OrdError::Corrupt(format!(
                "Snapshot header claims {} entries, found {}",
                self.entry_count,
                map.len()
            )));
        }

        Ok(map)
    }
}
