//! Snapshot Iterator
//!
//! Sequential decoding of the data block.

use crate::error::Result;
use crate::OrdError;

use super::ENTRY_HEADER_SIZE;

/// Iterator over snapshot entries in file order
///
/// Yields an error and then stops if an entry runs past the data block.
pub struct SnapshotIterator<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> SnapshotIterator<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                OrdError::Corrupt(format!(
                    "Truncated snapshot entry at data offset {}",
                    self.pos
                ))
            })?;
        let data = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_entry(&mut self) -> Result<(Vec<u8>, Vec<u8>)> {
        let header = self.take(ENTRY_HEADER_SIZE)?;
        let key_len = u32::from_le_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let val_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

        let key = self.take(key_len)?.to_vec();
        let value = self.take(val_len)?.to_vec();
        Ok((key, value))
    }
}

impl<'a> Iterator for SnapshotIterator<'a> {
    type Item = Result<(Vec<u8>, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let entry = self.read_entry();
        if entry.is_err() {
            self.failed = true;
        }
        Some(entry)
    }
}
