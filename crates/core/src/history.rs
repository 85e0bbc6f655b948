//! Bounded most-recent-first history

use std::collections::VecDeque;

/// Fixed-capacity sequence, newest entry at the front
///
/// Pushing past capacity evicts the oldest entry from the back. Order is
/// purely insertion order; values are never compared or sorted.
#[derive(Debug, Clone)]
pub struct History<V> {
    entries: VecDeque<V>,
    capacity: usize,
}

impl<V> History<V> {
    /// Create an empty history. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            // Don't reserve the whole capacity up front; most sensors never fill it
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Insert at the front, returning the evicted tail entry if the history was full
    pub fn push(&mut self, value: V) -> Option<V> {
        self.entries.push_front(value);
        if self.entries.len() > self.capacity {
            self.entries.pop_back()
        } else {
            None
        }
    }

    /// Most recently pushed entry
    pub fn latest(&self) -> Option<&V> {
        self.entries.front()
    }

    /// Iterate newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
