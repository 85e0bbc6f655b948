//! Ingest manager for scheduling sources and feeding the sensor stream

use log::{debug, error, trace, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fleet_sens_core::{BoxedReadingSource, SensorRegistry, SensorStream, DEFAULT_SOURCE_INTERVAL};

/// Tracks update timing for a source
struct ScheduledSource {
    source: BoxedReadingSource,
    interval: Duration,
    last_update: Option<Instant>,
}

impl ScheduledSource {
    fn is_due(&self, now: Instant) -> bool {
        match self.last_update {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}

/// Outcome of one scheduling pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Sources that were due and updated successfully
    pub updated: usize,
    /// Readings written to the stream
    pub ingested: usize,
    /// Readings dropped because their sensor is inactive or in maintenance
    pub skipped: usize,
    /// Sources whose update returned an error
    pub failed: usize,
}

/// Polls reading sources at their intervals and ingests what they produce
pub struct IngestManager {
    sources: Vec<ScheduledSource>,
    stream: Arc<SensorStream>,
    registry: Arc<SensorRegistry>,
}

impl IngestManager {
    pub fn new(stream: Arc<SensorStream>, registry: Arc<SensorRegistry>) -> Self {
        Self {
            sources: Vec::new(),
            stream,
            registry,
        }
    }

    /// Add a source, scheduled at its default interval
    ///
    /// Sources that report themselves unavailable are not scheduled.
    pub fn add_source(&mut self, source: BoxedReadingSource) {
        let metadata = source.metadata();
        if !source.is_available() {
            warn!("Source {} is not available, skipping", metadata.id);
            return;
        }

        let interval = if metadata.default_interval.is_zero() {
            DEFAULT_SOURCE_INTERVAL
        } else {
            metadata.default_interval
        };
        debug!("Scheduled source {} every {:?}", metadata.id, interval);

        self.sources.push(ScheduledSource {
            source,
            interval,
            last_update: None,
        });
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Shortest source interval, used as the scheduling tick
    pub fn base_interval(&self) -> Duration {
        self.sources
            .iter()
            .map(|scheduled| scheduled.interval)
            .min()
            .unwrap_or(DEFAULT_SOURCE_INTERVAL)
    }

    /// Update every source that is due at `now` and ingest its readings
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        for scheduled in self.sources.iter_mut().filter(|s| s.is_due(now)) {
            scheduled.last_update = Some(now);

            let source = &mut scheduled.source;
            if let Err(e) = source.update() {
                error!("Error updating source {}: {}", source.metadata().id, e);
                report.failed += 1;
                continue;
            }
            report.updated += 1;

            for reading in source.readings() {
                if self.registry.is_accepting(&reading.sensor_id) {
                    self.stream.ingest(reading);
                    report.ingested += 1;
                } else {
                    trace!("Dropped reading for non-active sensor {}", reading.sensor_id);
                    report.skipped += 1;
                }
            }
        }

        report
    }

    /// Start the ingestion loop
    ///
    /// This runs indefinitely, updating each source at its configured interval.
    pub async fn run(&mut self, base_interval: Duration) {
        let mut interval = tokio::time::interval(base_interval);

        loop {
            interval.tick().await;

            let start = Instant::now();
            let report = self.tick(start);
            trace!("Ingest cycle took {:?}: {:?}", start.elapsed(), report);
        }
    }
}
