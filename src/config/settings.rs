//! Application and sensor configuration

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use fleet_sens_core::{DEFAULT_HISTORY_CAPACITY, DEFAULT_HISTORY_LIMIT};
use fleet_sens_types::{
    GeoPoint, SensorRegistration, SensorStatus, SensorType, SignalMode, SimulatorConfig,
};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Reading retention settings
    #[serde(default)]
    pub stream: StreamConfig,
    /// Live dashboard settings
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Sensors to register and simulate
    #[serde(default = "default_sensors")]
    pub sensors: Vec<SensorConfig>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl AppConfig {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "github.fleet_sens", "fleet-sens")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            stream: StreamConfig::default(),
            dashboard: DashboardConfig::default(),
            sensors: default_sensors(),
        }
    }
}

/// Reading retention settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Readings kept per sensor before the oldest is evicted
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Entries returned by history queries that don't give a limit
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            history_limit: default_history_limit(),
        }
    }
}

/// Live dashboard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Number of recent values shown next to each sensor
    #[serde(default = "default_preview")]
    pub preview: usize,
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_preview() -> usize {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            preview: default_preview(),
        }
    }
}

/// A sensor to register, plus how to simulate it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub id: String,
    pub name: String,
    pub sensor_type: SensorType,
    /// Display unit; the category's default unit when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub location: GeoPoint,
    #[serde(default)]
    pub status: SensorStatus,
    /// Install date; registration time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

impl SensorConfig {
    /// Display unit for this sensor's readings
    pub fn unit(&self) -> String {
        self.unit
            .clone()
            .unwrap_or_else(|| self.sensor_type.default_unit().to_string())
    }

    /// Registration record for this sensor
    pub fn registration(&self) -> SensorRegistration {
        let mut registration =
            SensorRegistration::new(self.id.clone(), self.name.clone(), self.sensor_type.clone())
                .with_location(self.location)
                .with_status(self.status);
        if let Some(install_date) = self.install_date {
            registration.install_date = install_date;
        }
        registration
    }
}

/// Demo fleet instrumentation for a single vessel
fn default_sensors() -> Vec<SensorConfig> {
    let berth = GeoPoint::new(59.9036, 10.7394);
    let sensor = |id: &str, name: &str, sensor_type: SensorType, simulator: SimulatorConfig| {
        SensorConfig {
            id: id.to_string(),
            name: name.to_string(),
            sensor_type,
            unit: None,
            location: berth,
            status: SensorStatus::Active,
            install_date: None,
            simulator,
        }
    };

    vec![
        sensor(
            "T1",
            "Engine Temp",
            SensorType::Temperature,
            SimulatorConfig {
                mode: SignalMode::SineWave,
                base_value: 75.0,
                min_value: 60.0,
                max_value: 90.0,
                period: 120.0,
                noise: 0.5,
                update_interval_ms: 1000,
            },
        ),
        sensor(
            "P1",
            "Hull Pressure",
            SensorType::Pressure,
            SimulatorConfig {
                mode: SignalMode::RandomWalk,
                base_value: 2.0,
                min_value: 1.0,
                max_value: 3.0,
                period: 60.0,
                noise: 0.02,
                update_interval_ms: 2000,
            },
        ),
        sensor(
            "M1",
            "Bridge Motion",
            SensorType::Motion,
            SimulatorConfig {
                mode: SignalMode::Triangle,
                base_value: 0.0,
                min_value: -0.4,
                max_value: 0.4,
                period: 8.0,
                noise: 0.05,
                update_interval_ms: 500,
            },
        ),
        sensor(
            "C1",
            "Cabin Climate",
            SensorType::Climate,
            SimulatorConfig {
                mode: SignalMode::Constant,
                base_value: 45.0,
                min_value: 0.0,
                max_value: 100.0,
                period: 60.0,
                noise: 2.0,
                update_interval_ms: 5000,
            },
        ),
        SensorConfig {
            status: SensorStatus::Maintenance,
            ..sensor(
                "W1",
                "Ballast Water pH",
                SensorType::WaterQuality,
                SimulatorConfig {
                    mode: SignalMode::RandomWalk,
                    base_value: 7.4,
                    min_value: 6.5,
                    max_value: 8.5,
                    period: 60.0,
                    noise: 0.01,
                    update_interval_ms: 5000,
                },
            )
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = AppConfig::default();
        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();

        let ids: Vec<_> = loaded.sensors.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["T1", "P1", "M1", "C1", "W1"]);
        assert_eq!(loaded.sensors[4].status, SensorStatus::Maintenance);
        assert_eq!(loaded.sensors[0].simulator.mode, SignalMode::SineWave);
        assert_eq!(loaded.stream.capacity, 1000);
        assert_eq!(loaded.stream.history_limit, 100);
        assert_eq!(loaded.dashboard.poll_interval_ms, 1000);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.sensors.iter().any(|s| s.id == "T1" && s.name == "Engine Temp"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_sensor_registration_and_unit() {
        let json = r#"{
            "id": "S9",
            "name": "Salinity",
            "sensor_type": "salinity",
            "unit": "PSU",
            "status": "inactive",
            "install_date": "2023-06-01T12:00:00Z"
        }"#;
        let sensor: SensorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(sensor.unit(), "PSU");

        let registration = sensor.registration();
        assert_eq!(registration.sensor_type, SensorType::Other("salinity".to_string()));
        assert_eq!(registration.status, SensorStatus::Inactive);
        assert_eq!(registration.install_date.to_rfc3339(), "2023-06-01T12:00:00+00:00");
    }

    #[test]
    fn test_unit_falls_back_to_category_default() {
        let sensor = default_sensors().remove(0);
        assert_eq!(sensor.unit(), "°C");
    }
}
