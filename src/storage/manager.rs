//! Snapshot Manager
//!
//! Owns the on-disk location of a store and replaces its snapshot file.
//!
//! ## Responsibilities
//! - Derive file paths from the data directory
//! - Report whether persisted state exists
//! - Load the current snapshot
//! - Persist a new snapshot with the temp-file + fsync + rename discipline

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::memtable::OrderedMap;

use super::{SnapshotMeta, SnapshotReader, SnapshotWriter};

/// Manages the single snapshot file of a store
pub struct SnapshotManager {
    /// Directory holding the snapshot
    data_dir: PathBuf,

    /// Current snapshot path
    data_path: PathBuf,

    /// In-flight snapshot path (renamed over `data_path`)
    temp_path: PathBuf,

    /// fsync file and directory before a persist returns
    sync_writes: bool,
}

impl SnapshotManager {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "data.okv";
    const TEMP_FILENAME: &'static str = "data.okv.tmp";

    pub fn new(data_dir: &Path, sync_writes: bool) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            data_path: data_dir.join(Self::DATA_FILENAME),
            temp_path: data_dir.join(Self::TEMP_FILENAME),
            sync_writes,
        }
    }

    /// Whether a snapshot file is present
    pub fn exists(&self) -> bool {
        self.data_path.is_file()
    }

    /// Create the data directory (and parents) if needed
    pub fn create_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Read and validate the current snapshot
    pub fn load(&self) -> Result<OrderedMap> {
        let map = SnapshotReader::open(&self.data_path)?.into_map()?;
        debug!(
            path = %self.data_path.display(),
            entries = map.len(),
            "Loaded snapshot"
        );
        Ok(map)
    }

    /// Write `map` as the new snapshot
    ///
    /// Steps:
    /// 1. Write every entry to the temp file, in key order
    /// 2. fsync the temp file (if `sync_writes`)
    /// 3. Rename over the current snapshot (atomic on POSIX)
    /// 4. fsync the directory so the rename itself is durable (unix)
    ///
    /// On failure the previous snapshot is left in place and the temp file
    /// is removed on a best-effort basis.
    pub fn persist(&self, map: &OrderedMap) -> Result<SnapshotMeta> {
        match self.write_and_swap(map) {
            Ok(meta) => {
                debug!(
                    path = %self.data_path.display(),
                    entries = meta.entry_count,
                    bytes = meta.file_size,
                    "Persisted snapshot"
                );
                Ok(meta)
            }
            Err(e) => {
                warn!(path = %self.data_path.display(), error = %e, "Snapshot persist failed");
                let _ = fs::remove_file(&self.temp_path);
                Err(e)
            }
        }
    }

    fn write_and_swap(&self, map: &OrderedMap) -> Result<SnapshotMeta> {
        let mut writer = SnapshotWriter::new(&self.temp_path)?;
        for (key, value) in map {
            writer.add(key, value)?;
        }
        let mut meta = writer.finish(self.sync_writes)?;

        fs::rename(&self.temp_path, &self.data_path)?;
        meta.path = self.data_path.clone();

        #[cfg(unix)]
        {
            if self.sync_writes {
                if let Ok(dir) = File::open(&self.data_dir) {
                    let _ = dir.sync_all();
                }
            }
        }

        Ok(meta)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the current snapshot file
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the in-flight snapshot file
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}
