//! Shared sensor stream - bounded reading history per sensor
//!
//! This is the thread-safe counterpart of [`RingBufferStore`](crate::RingBufferStore)
//! for [`SensorReading`]s. Each sensor's history sits behind its own mutex so
//! ingestion for one sensor never waits on another. The collection lock is
//! only held long enough to look up or insert a history handle.

use log::{debug, trace, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fleet_sens_types::SensorReading;

use crate::constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_LIMIT};
use crate::history::History;

/// Thread-safe handle to one sensor's history
type HistoryHandle = Arc<Mutex<History<SensorReading>>>;

/// Counters describing stream activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StreamStats {
    /// Readings ingested since startup
    pub ingested: u64,
    /// Readings dropped because their sensor's history was full
    pub evicted: u64,
    /// Sensors with at least one stored reading
    pub sensors: usize,
}

/// Bounded, most-recent-first reading history for every sensor
///
/// None of the operations fail. A poisoned lock is recovered (the data is
/// still structurally valid) and unknown sensors read as empty.
pub struct SensorStream {
    histories: RwLock<HashMap<String, HistoryHandle>>,
    capacity: usize,
    ingested: AtomicU64,
    evicted: AtomicU64,
}

impl SensorStream {
    /// Create a stream keeping [`DEFAULT_HISTORY_CAPACITY`] readings per sensor
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a stream with a custom per-sensor capacity (0 is treated as 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            histories: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            ingested: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    /// Per-sensor capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add a reading to the front of its sensor's history
    ///
    /// The reading's timestamp plays no part in ordering: whatever is
    /// ingested last is the latest.
    pub fn ingest(&self, reading: SensorReading) {
        let handle = self.handle_or_insert(&reading.sensor_id);
        let sensor_id = reading.sensor_id.clone();

        let evicted = lock(&handle).push(reading);
        self.ingested.fetch_add(1, Ordering::Relaxed);
        if evicted.is_some() {
            self.evicted.fetch_add(1, Ordering::Relaxed);
            trace!("Evicted oldest reading for sensor {}", sensor_id);
        }
    }

    /// Up to `limit` most recent readings for a sensor, newest first
    ///
    /// `None` uses [`DEFAULT_HISTORY_LIMIT`].
    pub fn history(&self, sensor_id: &str, limit: Option<usize>) -> Vec<SensorReading> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let Some(handle) = self.handle(sensor_id) else {
            return Vec::new();
        };
        let history = lock(&handle);
        history.iter().take(limit).cloned().collect()
    }

    /// Most recent reading for a sensor
    pub fn latest(&self, sensor_id: &str) -> Option<SensorReading> {
        let handle = self.handle(sensor_id)?;
        let history = lock(&handle);
        history.latest().cloned()
    }

    /// Ids of sensors with at least one stored reading, in no particular order
    pub fn active_sensors(&self) -> Vec<String> {
        // Collect handles first so no history mutex is taken under the collection lock
        let handles: Vec<(String, HistoryHandle)> = read(&self.histories)
            .iter()
            .map(|(id, handle)| (id.clone(), Arc::clone(handle)))
            .collect();

        handles
            .into_iter()
            .filter(|(_, handle)| !lock(handle).is_empty())
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of readings stored for a sensor
    pub fn len(&self, sensor_id: &str) -> usize {
        self.handle(sensor_id).map_or(0, |handle| lock(&handle).len())
    }

    /// Latest reading of every active sensor, sorted by sensor id
    pub fn snapshot(&self) -> Vec<SensorReading> {
        let mut ids = self.active_sensors();
        ids.sort();
        ids.iter().filter_map(|id| self.latest(id)).collect()
    }

    /// Current activity counters
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            ingested: self.ingested.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            sensors: self.active_sensors().len(),
        }
    }

    fn handle(&self, sensor_id: &str) -> Option<HistoryHandle> {
        read(&self.histories).get(sensor_id).cloned()
    }

    fn handle_or_insert(&self, sensor_id: &str) -> HistoryHandle {
        // Common case: history already exists (read lock only)
        if let Some(handle) = self.handle(sensor_id) {
            return handle;
        }

        let mut histories = write(&self.histories);
        // Another thread may have inserted between the read and write lock
        let handle = histories.entry(sensor_id.to_string()).or_insert_with(|| {
            debug!(
                "Created history for sensor {} (capacity {})",
                sensor_id, self.capacity
            );
            Arc::new(Mutex::new(History::new(self.capacity)))
        });
        Arc::clone(handle)
    }
}

impl Default for SensorStream {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("Sensor stream lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("Sensor stream lock was poisoned, recovering");
        poisoned.into_inner()
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Sensor history mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use fleet_sens_types::SensorType;
    use std::thread;

    fn reading(sensor_id: &str, value: f64) -> SensorReading {
        SensorReading::new(sensor_id, SensorType::Temperature, value, "°C")
    }

    fn values(readings: &[SensorReading]) -> Vec<f64> {
        readings.iter().map(|r| r.value).collect()
    }

    #[test]
    fn test_latest_is_last_ingested() {
        let stream = SensorStream::new();
        stream.ingest(reading("T1", 70.0));
        stream.ingest(reading("T1", 72.0));

        assert_eq!(stream.latest("T1").unwrap().value, 72.0);
        assert_eq!(values(&stream.history("T1", Some(2))), vec![72.0, 70.0]);
    }

    #[test]
    fn test_out_of_order_timestamps_keep_ingestion_order() {
        let stream = SensorStream::new();
        let now = Utc::now();
        stream.ingest(reading("P1", 1.0).at(now));
        stream.ingest(reading("P1", 2.0).at(now - Duration::hours(1)));

        let latest = stream.latest("P1").unwrap();
        assert_eq!(latest.value, 2.0);
        assert!(latest.timestamp < now);
    }

    #[test]
    fn test_capacity_bounds_history_and_counts_evictions() {
        let stream = SensorStream::with_capacity(5);
        for i in 0..8 {
            stream.ingest(reading("M1", i as f64));
        }

        assert_eq!(stream.len("M1"), 5);
        assert_eq!(values(&stream.history("M1", Some(100))), vec![7.0, 6.0, 5.0, 4.0, 3.0]);

        let stats = stream.stats();
        assert_eq!(stats.ingested, 8);
        assert_eq!(stats.evicted, 3);
        assert_eq!(stats.sensors, 1);
    }

    #[test]
    fn test_unknown_sensor_reads_as_empty() {
        let stream = SensorStream::new();
        assert!(stream.history("nope", Some(10)).is_empty());
        assert!(stream.latest("nope").is_none());
        assert_eq!(stream.len("nope"), 0);
        assert!(stream.active_sensors().is_empty());
    }

    #[test]
    fn test_snapshot_is_sorted_by_sensor() {
        let stream = SensorStream::new();
        stream.ingest(reading("b", 1.0));
        stream.ingest(reading("a", 2.0));
        stream.ingest(reading("b", 3.0));

        let snapshot = stream.snapshot();
        let ids: Vec<_> = snapshot.iter().map(|r| r.sensor_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(values(&snapshot), vec![2.0, 3.0]);
    }

    #[test]
    fn test_concurrent_ingest_stays_bounded() {
        let stream = Arc::new(SensorStream::with_capacity(50));
        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || {
                    for i in 0..200 {
                        // Two workers share each sensor
                        let id = format!("S{}", worker % 2);
                        stream.ingest(reading(&id, i as f64));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(stream.len("S0"), 50);
        assert_eq!(stream.len("S1"), 50);
        let stats = stream.stats();
        assert_eq!(stats.ingested, 800);
        assert_eq!(stats.evicted, 700);
        assert_eq!(stats.sensors, 2);
    }
}
