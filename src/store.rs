//! Store Module
//!
//! The ordered key-value store that coordinates the memtable and its
//! on-disk snapshot.
//!
//! ## Responsibilities
//! - Load persisted state on open (with the configured corruption policy)
//! - Point get/put/delete
//! - Apply write batches with a single persist
//! - Hand out snapshot cursors
//! - Reject every operation after close

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::batch::WriteBatch;
use crate::config::{CorruptionPolicy, Options};
use crate::cursor::Cursor;
use crate::error::{OrdError, Result};
use crate::memtable::{MemTable, OrderedMap};
use crate::storage::SnapshotManager;

/// An embedded ordered key-value store
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (put/delete/apply_batch): serialized by `write_lock`,
///   which is held across the persist step. A mutation is applied to a
///   private working copy, persisted, and only then installed in the
///   memtable.
/// - **Reads** (get/cursor): take the memtable's read lock briefly and
///   never wait on disk I/O.
///
/// ## Durability
/// Every mutating call that returns `Ok` has its effect in the snapshot
/// file on disk. If persisting fails the call returns the error and the
/// in-memory state is left exactly as it was before the call.
pub struct Store {
    /// Options the store was opened with
    options: Options,

    /// Snapshot file management
    storage: SnapshotManager,

    /// Authoritative in-memory mapping
    memtable: MemTable,

    /// Serializes mutations (put/delete/apply_batch/close)
    write_lock: Mutex<()>,

    /// Set once by `close()`
    closed: AtomicBool,
}

impl Store {
    /// Open (or create) a store with the given options
    ///
    /// On startup:
    /// 1. If a snapshot exists, load it (or recover empty if it is corrupt
    ///    and the policy allows)
    /// 2. Otherwise create the directory and an empty snapshot when
    ///    `create_if_missing` is set, or fail with `NotFound`
    pub fn open(options: Options) -> Result<Self> {
        let storage = SnapshotManager::new(&options.data_dir, options.sync_writes);

        let map = if storage.exists() {
            if options.error_if_exists {
                return Err(OrdError::AlreadyExists(options.data_dir.clone()));
            }
            Self::load_snapshot(&storage, options.corruption_policy)?
        } else if options.create_if_missing {
            storage.create_dir()?;
            let map = OrderedMap::new();
            storage.persist(&map)?;
            info!(path = %options.data_dir.display(), "Created new store");
            map
        } else {
            return Err(OrdError::NotFound(options.data_dir.clone()));
        };

        debug!(
            path = %options.data_dir.display(),
            entries = map.len(),
            "Store opened"
        );

        Ok(Self {
            options,
            storage,
            memtable: MemTable::from_map(map),
            write_lock: Mutex::new(()),
            closed: AtomicBool::new(false),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default options with the given directory and create flag
    pub fn open_path(path: &Path, create_if_missing: bool) -> Result<Self> {
        let options = Options::builder()
            .data_dir(path)
            .create_if_missing(create_if_missing)
            .build();
        Self::open(options)
    }

    fn load_snapshot(storage: &SnapshotManager, policy: CorruptionPolicy) -> Result<OrderedMap> {
        let err = match storage.load() {
            Ok(map) => return Ok(map),
            Err(OrdError::Corrupt(reason)) => reason,
            Err(e) => format!("unreadable snapshot: {}", e),
        };

        match policy {
            CorruptionPolicy::Recover => {
                warn!(
                    path = %storage.data_path().display(),
                    reason = %err,
                    "Snapshot is corrupt, opening store empty"
                );
                Ok(OrderedMap::new())
            }
            CorruptionPolicy::Fail => Err(OrdError::Corrupt(err)),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the current value for `key`
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        Ok(self.memtable.get(key))
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &[u8]) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.memtable.contains_key(key))
    }

    /// Ascending cursor over the current contents
    pub fn cursor(&self) -> Result<Cursor> {
        Cursor::forward(self)
    }

    /// Descending cursor over the current contents
    pub fn reverse_cursor(&self) -> Result<Cursor> {
        Cursor::reverse(self)
    }

    /// Point-in-time view of the whole map, shared with the memtable
    pub(crate) fn snapshot(&self) -> Result<Arc<OrderedMap>> {
        self.ensure_open()?;
        Ok(self.memtable.snapshot())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert or replace a key-value pair, then persist
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.mutate(|map| {
            map.insert(key.to_vec(), value.to_vec());
            true
        })?;
        Ok(())
    }

    /// Remove `key` if present
    ///
    /// Deleting an absent key is not an error and performs no disk I/O:
    /// the snapshot is only rewritten when a key was actually removed.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.mutate(|map| map.remove(key).is_some())?;
        Ok(())
    }

    /// Apply every operation of `batch` in order, then persist once
    ///
    /// The batch is consumed. Nothing becomes visible to readers until the
    /// whole batch is on disk. A batch that changes nothing (empty, or only
    /// deletes of absent keys) is not persisted.
    pub fn apply_batch(&self, batch: WriteBatch) -> Result<()> {
        let operations = batch.into_operations();
        let count = operations.len();

        let persisted = self.mutate(|map| {
            let mut changed = false;
            for op in operations {
                changed |= op.apply_to(map);
            }
            changed
        })?;

        debug!(operations = count, persisted, "Applied write batch");
        Ok(())
    }

    /// Alias for [`apply_batch`](Self::apply_batch)
    pub fn write(&self, batch: WriteBatch) -> Result<()> {
        self.apply_batch(batch)
    }

    /// Run `apply` on a working copy; persist and install it if it changed
    ///
    /// Returns whether anything was persisted.
    fn mutate<F>(&self, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut OrderedMap) -> bool,
    {
        let _write_guard = self.write_lock.lock();
        self.ensure_open()?;

        let mut working = self.memtable.working_copy();
        if !apply(&mut working) {
            return Ok(false);
        }

        // Persist before install: a failed write leaves memory untouched
        self.storage.persist(&working)?;
        self.memtable.install(working);

        Ok(true)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Close the store
    ///
    /// Idempotent. Waits for an in-flight mutation to finish. Every
    /// successful mutation is already durable, so nothing is flushed here.
    pub fn close(&self) {
        let _write_guard = self.write_lock.lock();
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(path = %self.options.data_dir.display(), "Store closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(OrdError::Closed)
        } else {
            Ok(())
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of keys
    pub fn len(&self) -> Result<usize> {
        self.ensure_open()?;
        Ok(self.memtable.entry_count())
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.memtable.is_empty())
    }

    /// Approximate size of keys plus values, in bytes
    pub fn approximate_size(&self) -> usize {
        self.memtable.size()
    }

    /// Get the data directory path
    pub fn path(&self) -> &Path {
        &self.options.data_dir
    }

    /// Path of the snapshot file
    pub fn snapshot_path(&self) -> &Path {
        self.storage.data_path()
    }

    /// Get the options
    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}
