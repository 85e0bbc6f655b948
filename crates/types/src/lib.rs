//! fleet-sens-types: Shared data types for fleet-sens.
//!
//! This crate contains pure data types (readings, registrations, source
//! configs) that are shared across all fleet-sens crates. They carry no
//! storage or scheduling logic.

pub mod reading;
pub mod registration;
pub mod source_configs;

// Re-export commonly used types at the crate root for convenience
pub use reading::{GeoPoint, SensorReading, SensorType};
pub use registration::{SensorRegistration, SensorStatus};
pub use source_configs::{SignalMode, SimulatorConfig};
