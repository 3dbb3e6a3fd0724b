//! MemTable implementation
//!
//! Copy-on-install BTreeMap with RwLock for concurrency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::OrderedMap;

/// In-memory ordered index
///
/// ## Concurrency:
/// - `data`: RwLock around the currently published map. Readers hold the
///   read lock only long enough to look up a key or clone the `Arc`.
/// - `size`: atomic, refreshed on every install
pub struct MemTable {
    data: RwLock<Arc<OrderedMap>>,
    size: AtomicUsize,
}

impl MemTable {
    /// Create a new empty MemTable
    pub fn new() -> Self {
        Self::from_map(OrderedMap::new())
    }

    /// Create a MemTable that publishes `map` (used when loading a snapshot)
    pub fn from_map(map: OrderedMap) -> Self {
        let size = Self::measure(&map);
        Self {
            data: RwLock::new(Arc::new(map)),
            size: AtomicUsize::new(size),
        }
    }

    /// Get a copy of the value stored for `key`
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.data.read().get(key).cloned()
    }

    /// Check whether `key` is present
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.data.read().contains_key(key)
    }

    /// Take a point-in-time snapshot of the whole map
    ///
    /// O(1): the snapshot shares the published map. Later installs replace
    /// the published map and leave this one untouched.
    pub fn snapshot(&self) -> Arc<OrderedMap> {
        Arc::clone(&self.data.read())
    }

    /// Clone the published map so a writer can modify it privately
    pub fn working_copy(&self) -> OrderedMap {
        OrderedMap::clone(&self.data.read())
    }

    /// Publish `map` as the new current state
    pub fn install(&self, map: OrderedMap) {
        let size = Self::measure(&map);
        *self.data.write() = Arc::new(map);
        self.size.store(size, Ordering::SeqCst);
    }

    /// Approximate size in bytes (sum of key and value lengths)
    pub fn size(&self) -> usize {
        self.size.load(Ordering::SeqCst)
    }

    /// Number of live keys
    pub fn entry_count(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn measure(map: &OrderedMap) -> usize {
        map.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}
