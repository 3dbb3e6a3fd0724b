//! Cursor adapters
//!
//! Key-only, value-only, prefix and range views over a [`Cursor`].

use super::{Cursor, Direction};

/// Keys of the remaining entries
#[derive(Debug)]
pub struct Keys {
    cursor: Cursor,
}

impl Keys {
    pub(super) fn new(cursor: Cursor) -> Self {
        Self { cursor }
    }
}

impl Iterator for Keys {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_key()
    }
}

/// Values of the remaining entries
#[derive(Debug)]
pub struct Values {
    cursor: Cursor,
}

impl Values {
    pub(super) fn new(cursor: Cursor) -> Self {
        Self { cursor }
    }
}

impl Iterator for Values {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_value()
    }
}

/// Entries sharing a key prefix
#[derive(Debug)]
pub struct PrefixIter {
    cursor: Cursor,
    prefix: Vec<u8>,
}

impl PrefixIter {
    pub(super) fn new(cursor: Cursor, prefix: Vec<u8>) -> Self {
        Self { cursor, prefix }
    }
}

impl Iterator for PrefixIter {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.cursor.next()?;
        if key.starts_with(&self.prefix) {
            Some((key, value))
        } else {
            // Matching keys are contiguous; the first miss ends the scan
            self.cursor.exhaust();
            None
        }
    }
}

/// Entries inside an inclusive key range
#[derive(Debug)]
pub struct RangeIter {
    cursor: Cursor,
    start: Vec<u8>,
    end: Vec<u8>,
}

impl RangeIter {
    pub(super) fn new(cursor: Cursor, start: Vec<u8>, end: Vec<u8>) -> Self {
        Self { cursor, start, end }
    }
}

impl Iterator for RangeIter {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, value) = self.cursor.next()?;
        let inside = match self.cursor.direction() {
            Direction::Forward => key <= self.end,
            Direction::Reverse => key >= self.start,
        };
        if inside {
            Some((key, value))
        } else {
            self.cursor.exhaust();
            None
        }
    }
}
