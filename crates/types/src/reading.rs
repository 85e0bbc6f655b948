//! Sensor readings and the categories they belong to

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a sensor or reading
///
/// The known categories cover the fleet's standard instrumentation. Anything
/// else is kept verbatim in [`SensorType::Other`] so new sensor kinds can be
/// ingested without a code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SensorType {
    Temperature,
    Pressure,
    Motion,
    Climate,
    WaterQuality,
    /// Category not known to this build (e.g. "salinity")
    Other(String),
}

impl SensorType {
    /// Serialized name of this category
    pub fn as_str(&self) -> &str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Pressure => "pressure",
            SensorType::Motion => "motion",
            SensorType::Climate => "climate",
            SensorType::WaterQuality => "water_quality",
            SensorType::Other(name) => name,
        }
    }

    /// Display unit used when a sensor config doesn't name one
    pub fn default_unit(&self) -> &'static str {
        match self {
            SensorType::Temperature => "°C",
            SensorType::Pressure => "bar",
            SensorType::Motion => "g",
            SensorType::Climate => "%RH",
            SensorType::WaterQuality => "pH",
            SensorType::Other(_) => "",
        }
    }
}

impl From<String> for SensorType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "temperature" => SensorType::Temperature,
            "pressure" => SensorType::Pressure,
            "motion" => SensorType::Motion,
            "climate" => SensorType::Climate,
            "water_quality" => SensorType::WaterQuality,
            _ => SensorType::Other(value),
        }
    }
}

impl From<&str> for SensorType {
    fn from(value: &str) -> Self {
        SensorType::from(value.to_string())
    }
}

impl From<SensorType> for String {
    fn from(value: SensorType) -> Self {
        match value {
            SensorType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single measurement produced by a sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Id of the originating sensor
    pub sensor_id: String,
    /// Category of the measurement
    pub sensor_type: SensorType,
    /// Measured value
    pub value: f64,
    /// Display unit (informational only)
    pub unit: String,
    /// When the sensor produced the reading, not when it was ingested
    pub timestamp: DateTime<Utc>,
    /// Where the reading was taken, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
}

impl SensorReading {
    /// Create a reading stamped with the current time
    pub fn new(
        sensor_id: impl Into<String>,
        sensor_type: SensorType,
        value: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            sensor_type,
            value,
            unit: unit.into(),
            timestamp: Utc::now(),
            location: None,
        }
    }

    /// Set the production timestamp
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach a location
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_type_serialization() {
        let json = serde_json::to_string(&SensorType::WaterQuality).unwrap();
        assert_eq!(json, "\"water_quality\"");

        let parsed: SensorType = serde_json::from_str("\"pressure\"").unwrap();
        assert_eq!(parsed, SensorType::Pressure);
    }

    #[test]
    fn test_unknown_sensor_type_is_kept() {
        let parsed: SensorType = serde_json::from_str("\"salinity\"").unwrap();
        assert_eq!(parsed, SensorType::Other("salinity".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"salinity\"");
        assert_eq!(parsed.default_unit(), "");
    }

    #[test]
    fn test_reading_without_location_omits_field() {
        let reading = SensorReading::new("T1", SensorType::Temperature, 70.0, "°C");
        let json = serde_json::to_value(&reading).unwrap();
        assert!(json.get("location").is_none());
        assert_eq!(json["sensor_type"], "temperature");

        let located = reading.with_location(GeoPoint::new(59.9, 10.7));
        let json = serde_json::to_value(&located).unwrap();
        assert_eq!(json["location"]["latitude"], 59.9);
    }
}
