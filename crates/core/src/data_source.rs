//! Reading source trait and related types

use anyhow::Result;
use fleet_sens_types::SensorReading;
use std::time::Duration;

/// Metadata about a reading source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Unique identifier for this source
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this source provides
    pub description: String,
    /// Sensors this source produces readings for
    pub sensor_ids: Vec<String>,
    /// Recommended update interval
    pub default_interval: Duration,
}

/// Trait for anything that produces sensor readings
///
/// Sources are polled by the ingest manager: `update` collects fresh data,
/// `readings` hands over what the last update produced.
pub trait ReadingSource: Send + Sync {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Collect fresh readings
    fn update(&mut self) -> Result<()>;

    /// Readings produced by the last update
    fn readings(&self) -> Vec<SensorReading>;

    /// Check if this source can produce data on the current system
    fn is_available(&self) -> bool {
        true
    }
}

/// Type-erased reading source for dynamic dispatch
pub type BoxedReadingSource = Box<dyn ReadingSource>;
