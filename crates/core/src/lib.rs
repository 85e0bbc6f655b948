//! fleet-sens-core: Sensor history store and registry for fleet-sens.
//!
//! This crate contains the bounded per-key history store, the key registry,
//! their thread-safe sensor-specific wrappers, the reading source trait and
//! shared constants.

pub mod constants;
mod data_source;
mod history;
mod registry;
mod ring_buffer;
mod sensor_registry;
mod sensor_stream;

pub use constants::{
    DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_LIMIT, DEFAULT_POLL_INTERVAL,
    DEFAULT_SOURCE_INTERVAL,
};
pub use data_source::{BoxedReadingSource, ReadingSource, SourceMetadata};
pub use history::History;
pub use registry::{KeyRegistry, RegistryEntry, RegistryError};
pub use ring_buffer::RingBufferStore;
pub use sensor_registry::SensorRegistry;
pub use sensor_stream::{SensorStream, StreamStats};

// Re-export types used in signatures for convenience
pub use fleet_sens_types::{SensorReading, SensorRegistration, SensorStatus, SensorType};
