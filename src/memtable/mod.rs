//! MemTable Module
//!
//! The authoritative in-memory ordered index of a store.
//!
//! ## Responsibilities
//! - Point lookups with lexicographic byte ordering
//! - Cheap point-in-time snapshots for cursors and persistence
//! - Track approximate size in bytes
//!
//! ## Data Structure Choice
//! `BTreeMap` behind `Arc`, wrapped in a `RwLock`:
//! - Ordered keys (required for cursors and the sorted snapshot file)
//! - Snapshots share the map structurally: taking one is an `Arc` clone
//! - Writers never mutate a published map; they build a working copy and
//!   install it, so a snapshot can never change underneath its holder

mod table;

use std::collections::BTreeMap;

pub use table::MemTable;

/// The ordered key → value mapping shared by the memtable and its snapshots
pub type OrderedMap = BTreeMap<Vec<u8>, Vec<u8>>;
