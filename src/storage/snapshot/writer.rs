//! Snapshot Writer
//!
//! Writes sorted key-value entries to a new snapshot file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::OrdError;

use super::{SnapshotMeta, HEADER_SIZE, MAGIC, VERSION};

/// Writer for snapshot files
///
/// Writes the header immediately; call `add()` in strictly ascending key
/// order, then `finish()` to write the footer and patch the entry count.
pub struct SnapshotWriter {
    /// Output file path
    path: PathBuf,
    /// Buffered writer for performance
    writer: BufWriter<File>,
    /// Number of entries written
    entry_count: u64,
    /// Last key written, to enforce ordering
    last_key: Option<Vec<u8>>,
    /// Running CRC hasher for data section
    data_hasher: crc32fast::Hasher,
}

impl SnapshotWriter {
    pub fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?; // Placeholder for entry count

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            entry_count: 0,
            last_key: None,
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add a key-value pair (keys must be strictly ascending)
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if let Some(last) = &self.last_key {
            if key <= last.as_slice() {
                return Err(OrdError::Storage(format!(
                    "Snapshot keys out of order: {:?} after {:?}",
                    key, last
                )));
            }
        }

        let key_len = Self::encode_len(key.len(), "key")?.to_le_bytes();
        let val_len = Self::encode_len(value.len(), "value")?.to_le_bytes();

        // [key_len(4)][val_len(4)][key][value]
        for chunk in [&key_len[..], &val_len[..], key, value] {
            self.writer.write_all(chunk)?;
            self.data_hasher.update(chunk);
        }

        self.last_key = Some(key.to_vec());
        self.entry_count += 1;

        Ok(())
    }

    /// Write the footer, patch the header and optionally fsync
    pub fn finish(mut self, sync: bool) -> Result<SnapshotMeta> {
        let data_crc = self.data_hasher.finalize();

        // Footer: data_crc (4) + padding (4)
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;
        self.writer.flush()?;

        let mut file = self.writer.into_inner().map_err(|e| {
            OrdError::Storage(format!("Failed to flush snapshot: {}", e))
        })?;
        file.seek(SeekFrom::Start(HEADER_SIZE - 8))?; // After magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;

        if sync {
            file.sync_all()?;
        }

        let file_size = file.metadata()?.len();

        Ok(SnapshotMeta {
            path: self.path,
            entry_count: self.entry_count,
            file_size,
        })
    }

    fn encode_len(len: usize, what: &str) -> Result<u32> {
        u32::try_from(len).map_err(|_| {
            OrdError::Storage(format!("{} of {} bytes exceeds the snapshot limit", what, len))
        })
    }
}
