//! Per-key bounded history store
//!
//! `RingBufferStore` keeps one [`History`] per key. It is a passive,
//! best-effort buffer: nothing here fails, and missing keys simply read as
//! empty. It takes `&mut self` for writes and does no locking of its own;
//! see [`SensorStream`](crate::SensorStream) for the shared version.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use log::{debug, trace};

use crate::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_LIMIT};
use crate::history::History;

/// Bounded, most-recent-first history per key
#[derive(Debug, Clone)]
pub struct RingBufferStore<K, V> {
    histories: HashMap<K, History<V>>,
    capacity: usize,
}

impl<K, V> RingBufferStore<K, V>
where
    K: Eq + Hash,
{
    /// Create a store keeping [`DEFAULT_HISTORY_CAPACITY`] entries per key
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a store with a custom per-key capacity (0 is treated as 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Per-key capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert `value` at the front of `key`'s history
    ///
    /// Creates the history on first use. Once the history is full, each
    /// insert evicts the oldest entry.
    pub fn ingest(&mut self, key: K, value: V) {
        let capacity = self.capacity;
        let history = self.histories.entry(key).or_insert_with(|| {
            debug!("Creating history (capacity {})", capacity);
            History::new(capacity)
        });
        if history.push(value).is_some() {
            trace!("History full, evicted oldest entry");
        }
    }

    /// Up to `limit` most recent entries for `key`, newest first
    ///
    /// `None` uses [`DEFAULT_HISTORY_LIMIT`]. Unknown keys yield nothing.
    pub fn history<Q>(&self, key: &Q, limit: Option<usize>) -> impl Iterator<Item = &V> + '_
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.histories
            .get(key)
            .into_iter()
            .flat_map(move |history| history.iter().take(limit))
    }

    /// Most recent entry for `key`
    pub fn latest<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.histories.get(key).and_then(History::latest)
    }

    /// Keys that currently hold at least one entry, in no particular order
    pub fn active_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.histories
            .iter()
            .filter(|(_, history)| !history.is_empty())
            .map(|(key, _)| key)
    }

    /// Number of entries stored for `key`
    pub fn len<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.histories.get(key).map_or(0, History::len)
    }
}

impl<K, V> Default for RingBufferStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}
