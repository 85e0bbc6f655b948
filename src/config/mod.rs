//! Configuration management

mod settings;

pub use settings::{AppConfig, DashboardConfig, SensorConfig, StreamConfig, CONFIG_VERSION};
