//! fleet-sens: In-memory sensor telemetry buffer for vessel fleets
//!
//! This library provides the application layer of fleet-sens:
//! - Configuration loading (sensors, retention, dashboard)
//! - Scheduled ingestion from reading sources into the sensor stream
//! - A polling dashboard over the latest readings
//!
//! The store and registry themselves live in `fleet-sens-core`.

pub mod config;
pub mod core;

// Re-export commonly used types
pub use config::AppConfig;
pub use core::{Dashboard, FleetApp, IngestManager};
pub use fleet_sens_core::{SensorRegistry, SensorStream};
