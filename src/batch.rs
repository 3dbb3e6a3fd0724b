//! Write Batch
//!
//! An ordered list of pending mutations, recorded without touching any
//! store and applied as one unit by [`Store::apply_batch`](crate::Store::apply_batch).
//!
//! ## Lifecycle
//! ```text
//! Empty ──put/delete──▶ Recording ──Store::apply_batch(batch)──▶ Submitted
//! ```
//! `apply_batch` takes the batch by value, so a submitted batch cannot be
//! recorded into again.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::memtable::OrderedMap;

/// Operations that can be recorded in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl Operation {
    /// The key this operation targets
    pub fn key(&self) -> &[u8] {
        match self {
            Operation::Put { key, .. } | Operation::Delete { key } => key,
        }
    }

    /// Apply to `map`, returning whether the map changed
    pub(crate) fn apply_to(self, map: &mut OrderedMap) -> bool {
        match self {
            Operation::Put { key, value } => {
                map.insert(key, value);
                true
            }
            Operation::Delete { key } => map.remove(&key).is_some(),
        }
    }
}

/// Ordered collection of pending operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    operations: Vec<Operation>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a put
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.operations.push(Operation::Put {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Record a delete
    pub fn delete(&mut self, key: impl Into<Vec<u8>>) -> &mut Self {
        self.operations.push(Operation::Delete { key: key.into() });
        self
    }

    /// Number of recorded operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Drop every recorded operation
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Recorded operations, in order
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Encode the recorded operations (bincode)
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Rebuild a batch from [`to_bytes`](Self::to_bytes) output
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub(crate) fn into_operations(self) -> Vec<Operation> {
        self.operations
    }
}

impl<'a> IntoIterator for &'a WriteBatch {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
