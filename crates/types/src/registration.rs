//! Static sensor metadata recorded at registration time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reading::{GeoPoint, SensorType};

/// Operational status of a registered sensor
///
/// Any status may follow any other; there is no transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorStatus::Active => "active",
            SensorStatus::Inactive => "inactive",
            SensorStatus::Maintenance => "maintenance",
        };
        f.write_str(name)
    }
}

/// A sensor known to the fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorRegistration {
    /// Unique id, same namespace as [`SensorReading::sensor_id`](crate::SensorReading)
    pub id: String,
    /// Human-readable label (e.g. "Engine Temp")
    pub name: String,
    pub sensor_type: SensorType,
    /// Fixed install coordinate
    pub location: GeoPoint,
    pub install_date: DateTime<Utc>,
    /// The only field that may change after registration
    #[serde(default)]
    pub status: SensorStatus,
}

impl SensorRegistration {
    /// Create an active registration installed now
    pub fn new(id: impl Into<String>, name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sensor_type,
            location: GeoPoint::default(),
            install_date: Utc::now(),
            status: SensorStatus::Active,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = location;
        self
    }

    pub fn with_status(mut self, status: SensorStatus) -> Self {
        self.status = status;
        self
    }
}
