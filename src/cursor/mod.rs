//! Cursor Module
//!
//! Read-only ordered traversal over a point-in-time snapshot of a store.
//!
//! ## Snapshot Semantics
//! A cursor holds the store's map as it was when the cursor was created.
//! The store never mutates a published map (see [`MemTable`](crate::memtable::MemTable)),
//! so both the key set and the values a cursor yields are frozen: later
//! puts, deletes and batches are invisible to it, and a cursor keeps working
//! after its store is closed.
//!
//! ## Ordering
//! - `Direction::Forward`: ascending lexicographic byte order
//! - `Direction::Reverse`: descending lexicographic byte order
//!
//! All positioning operations (`seek`, `seek_to_first`, `seek_to_last`)
//! are expressed in the cursor's own order.

mod iterator;

use std::ops::Bound;
use std::sync::Arc;

use crate::error::Result;
use crate::memtable::OrderedMap;
use crate::store::Store;

pub use iterator::{Keys, PrefixIter, RangeIter, Values};

/// Traversal direction of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One-pass ordered cursor over a snapshot
pub struct Cursor {
    snapshot: Arc<OrderedMap>,
    direction: Direction,
    /// Key the next call to `next()` yields; `None` once exhausted
    current: Option<Vec<u8>>,
}

impl Cursor {
    /// Ascending cursor over the store's current contents
    pub fn forward(store: &Store) -> Result<Self> {
        Ok(Self::new(store.snapshot()?, Direction::Forward))
    }

    /// Descending cursor over the store's current contents
    pub fn reverse(store: &Store) -> Result<Self> {
        Ok(Self::new(store.snapshot()?, Direction::Reverse))
    }

    pub(crate) fn new(snapshot: Arc<OrderedMap>, direction: Direction) -> Self {
        let mut cursor = Self {
            snapshot,
            direction,
            current: None,
        };
        cursor.seek_to_first();
        cursor
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Position at the first entry in cursor order
    pub fn seek_to_first(&mut self) {
        self.current = match self.direction {
            Direction::Forward => self.snapshot.keys().next().cloned(),
            Direction::Reverse => self.snapshot.keys().next_back().cloned(),
        };
    }

    /// Position at the last entry in cursor order
    ///
    /// The next `next()` yields that entry and then the cursor is exhausted.
    pub fn seek_to_last(&mut self) {
        self.current = match self.direction {
            Direction::Forward => self.snapshot.keys().next_back().cloned(),
            Direction::Reverse => self.snapshot.keys().next().cloned(),
        };
    }

    /// Position at the first key at or beyond `target` in cursor order
    ///
    /// Forward: the smallest key `>= target`. Reverse: the largest key
    /// `<= target`. Exhausts the cursor when no key qualifies.
    pub fn seek(&mut self, target: &[u8]) {
        self.seek_bound(Bound::Included(target));
    }

    /// Position at the first key beyond `bound` in cursor order
    pub(crate) fn seek_bound(&mut self, bound: Bound<&[u8]>) {
        self.current = self.first_from(bound).map(|(k, _)| k.clone());
    }

    /// Mark the cursor exhausted
    pub(crate) fn exhaust(&mut self) {
        self.current = None;
    }

    fn first_from(&self, bound: Bound<&[u8]>) -> Option<(&Vec<u8>, &Vec<u8>)> {
        match self.direction {
            Direction::Forward => self
                .snapshot
                .range::<[u8], _>((bound, Bound::Unbounded))
                .next(),
            Direction::Reverse => self
                .snapshot
                .range::<[u8], _>((Bound::Unbounded, bound))
                .next_back(),
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Whether the cursor points at an entry
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_exhausted(&self) -> bool {
        self.current.is_none()
    }

    /// Key at the current position, without advancing
    pub fn key(&self) -> Option<&[u8]> {
        self.current.as_deref()
    }

    /// Value at the current position, without advancing
    pub fn value(&self) -> Option<&[u8]> {
        let key = self.current.as_ref()?;
        self.snapshot.get(key).map(|v| v.as_slice())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of entries in the snapshot
    pub fn snapshot_len(&self) -> usize {
        self.snapshot.len()
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// Yield the current key and advance
    pub fn next_key(&mut self) -> Option<Vec<u8>> {
        self.next().map(|(key, _)| key)
    }

    /// Yield the current value and advance
    pub fn next_value(&mut self) -> Option<Vec<u8>> {
        self.next().map(|(_, value)| value)
    }

    /// Key-only view of the remaining entries
    pub fn keys(self) -> Keys {
        Keys::new(self)
    }

    /// Value-only view of the remaining entries
    pub fn values(self) -> Values {
        Values::new(self)
    }

    /// Entries whose key starts with `prefix`, in cursor order
    ///
    /// Repositions the cursor at the first matching key and stops at the
    /// first key without the prefix.
    pub fn prefix(mut self, prefix: &[u8]) -> PrefixIter {
        match self.direction {
            Direction::Forward => self.seek(prefix),
            Direction::Reverse => match prefix_successor(prefix) {
                Some(upper) => self.seek_bound(Bound::Excluded(upper.as_slice())),
                None => self.seek_to_first(),
            },
        }
        PrefixIter::new(self, prefix.to_vec())
    }

    /// Entries with `start <= key <= end`, in cursor order
    pub fn range(mut self, start: &[u8], end: &[u8]) -> RangeIter {
        match self.direction {
            Direction::Forward => self.seek(start),
            Direction::Reverse => self.seek(end),
        }
        RangeIter::new(self, start.to_vec(), end.to_vec())
    }
}

impl Iterator for Cursor {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.current.take()?;
        let value = self.snapshot.get(&key)?.clone();
        self.seek_bound(Bound::Excluded(key.as_slice()));
        Some((key, value))
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("direction", &self.direction)
            .field("snapshot_len", &self.snapshot.len())
            .field("current", &self.current)
            .finish()
    }
}

/// Smallest byte string greater than every string starting with `prefix`
///
/// `None` when no such bound exists (empty prefix, or all `0xff` bytes).
fn prefix_successor(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.pop() {
        if last < u8::MAX {
            upper.push(last + 1);
            return Some(upper);
        }
    }
    None
}
