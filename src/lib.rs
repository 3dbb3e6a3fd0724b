//! # ordkv
//!
//! An embedded, single-process ordered key-value store with:
//! - Lexicographically ordered byte-string keys
//! - A durable sorted snapshot rewritten atomically on every mutation
//! - Snapshot cursors (forward, reverse, seek, prefix, range)
//! - Write batches applied with a single persist
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌─────────────┐   apply_batch   ┌──────────────────────────────┐
//!  │ WriteBatch  ├────────────────▶│            Store             │
//!  └─────────────┘                 │   (write lock, close flag)   │
//!                                  └──────┬────────────────┬──────┘
//!                                         │                │
//!                                         ▼                ▼
//!                                  ┌─────────────┐  ┌─────────────┐
//!                                  │  MemTable   │  │  Snapshot   │
//!                                  │ Arc<BTree>  │  │   Manager   │
//!                                  └──────┬──────┘  └──────┬──────┘
//!                                         │                │
//!                                         ▼                ▼
//!                                  ┌─────────────┐  ┌─────────────┐
//!                                  │   Cursor    │  │  data.okv   │
//!                                  │ (snapshot)  │  │  (sorted)   │
//!                                  └─────────────┘  └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use ordkv::WriteBatch;
//!
//! let store = ordkv::open("./ordkv_data", true)?;
//! store.put(b"a", b"1")?;
//!
//! let mut batch = WriteBatch::new();
//! batch.put("b", "2").delete("a");
//! store.apply_batch(batch)?;
//!
//! for (key, value) in store.cursor()? {
//!     println!("{:?} => {:?}", key, value);
//! }
//! store.close();
//! # Ok::<(), ordkv::OrdError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod memtable;
pub mod storage;
pub mod batch;
pub mod cursor;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{OrdError, Result};
pub use config::{CorruptionPolicy, Options};
pub use batch::{Operation, WriteBatch};
pub use cursor::{Cursor, Direction};
pub use store::Store;

use std::path::Path;

/// Open the store at `path`, creating it when `create_if_missing` is set
pub fn open(path: impl AsRef<Path>, create_if_missing: bool) -> Result<Store> {
    Store::open_path(path.as_ref(), create_if_missing)
}

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ordkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
