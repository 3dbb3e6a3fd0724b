//! Configuration for ordkv
//!
//! Open/create options consumed by [`Store::open`](crate::Store::open).

use std::path::PathBuf;

/// Options controlling how a store is opened
#[derive(Debug, Clone)]
pub struct Options {
    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------
    /// Directory holding the store's files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── data.okv         (current snapshot)
    ///     └── data.okv.tmp     (in-flight snapshot, renamed over data.okv)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Open Behaviour
    // -------------------------------------------------------------------------
    /// Create an empty store when none exists at `data_dir`
    pub create_if_missing: bool,

    /// Refuse to open a store that already exists
    pub error_if_exists: bool,

    /// What to do when the persisted snapshot cannot be read
    pub corruption_policy: CorruptionPolicy,

    // -------------------------------------------------------------------------
    // Durability
    // -------------------------------------------------------------------------
    /// fsync the snapshot (and its directory) before a mutation returns.
    /// Turning this off leaves durability to the OS page cache.
    pub sync_writes: bool,
}

/// Handling of an unreadable snapshot at open time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionPolicy {
    /// Log a warning and open the store empty
    Recover,

    /// Fail the open with `OrdError::Corrupt`
    Fail,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./ordkv_data"),
            create_if_missing: false,
            error_if_exists: false,
            corruption_policy: CorruptionPolicy::Recover,
            sync_writes: true,
        }
    }
}

impl Options {
    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }
}

/// Builder for Options
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.data_dir = path.into();
        self
    }

    /// Create the store if it does not exist yet
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.options.create_if_missing = create;
        self
    }

    /// Fail if the store already exists
    pub fn error_if_exists(mut self, error: bool) -> Self {
        self.options.error_if_exists = error;
        self
    }

    /// Set the corruption policy
    pub fn corruption_policy(mut self, policy: CorruptionPolicy) -> Self {
        self.options.corruption_policy = policy;
        self
    }

    /// Enable or disable fsync on every persist
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.options.sync_writes = sync;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
