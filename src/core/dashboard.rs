//! Polling dashboard over the sensor stream
//!
//! The dashboard never touches source or ingestion state. Each poll asks the
//! stream which sensors have data and reads their latest value, so a sensor
//! without readings simply doesn't appear.

use chrono::{DateTime, Utc};
use log::trace;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use fleet_sens_core::{SensorRegistry, SensorStatus, SensorStream, SensorType};

/// One dashboard line: latest reading joined with registration metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub sensor_id: String,
    /// Registered name, if the sensor is registered
    pub name: Option<String>,
    pub status: Option<SensorStatus>,
    pub sensor_type: SensorType,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    /// Most recent values, newest first (includes `value`)
    pub recent: Vec<f64>,
}

impl DashboardRow {
    fn format(&self) -> String {
        let name = self.name.as_deref().unwrap_or("(unregistered)");
        let status = self
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let recent = self
            .recent
            .iter()
            .map(|v| format!("{:.2}", v))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{:<8} {:<20} {:<12} {:>10.2} {:<5} [{}] {}",
            self.sensor_id,
            name,
            status,
            self.value,
            self.unit,
            recent,
            self.timestamp.format("%H:%M:%S"),
        )
    }
}

/// Periodic reader of the latest value per sensor
#[derive(Clone)]
pub struct Dashboard {
    stream: Arc<SensorStream>,
    registry: Arc<SensorRegistry>,
    preview: usize,
}

impl Dashboard {
    pub fn new(stream: Arc<SensorStream>, registry: Arc<SensorRegistry>, preview: usize) -> Self {
        Self {
            stream,
            registry,
            preview,
        }
    }

    /// Current rows, sorted by sensor id
    pub fn rows(&self) -> Vec<DashboardRow> {
        let mut sensor_ids = self.stream.active_sensors();
        sensor_ids.sort();

        sensor_ids
            .into_iter()
            .filter_map(|sensor_id| {
                let latest = self.stream.latest(&sensor_id)?;
                let registration = self.registry.get(&sensor_id);
                let recent = self
                    .stream
                    .history(&sensor_id, Some(self.preview))
                    .into_iter()
                    .map(|reading| reading.value)
                    .collect();

                Some(DashboardRow {
                    name: registration.as_ref().map(|r| r.name.clone()),
                    status: registration.map(|r| r.status),
                    sensor_type: latest.sensor_type,
                    value: latest.value,
                    unit: latest.unit,
                    timestamp: latest.timestamp,
                    recent,
                    sensor_id,
                })
            })
            .collect()
    }

    /// Render the current rows as text, one line per sensor
    pub fn render_text(&self) -> String {
        let rows = self.rows();
        if rows.is_empty() {
            return "no data".to_string();
        }
        rows.iter()
            .map(DashboardRow::format)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Start the polling loop, printing the dashboard every `poll_interval`
    pub async fn run(&self, poll_interval: Duration) {
        let mut interval = tokio::time::interval(poll_interval);

        loop {
            interval.tick().await;
            trace!("Polling dashboard");
            println!("{}\n", self.render_text());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_sens_core::{SensorReading, SensorRegistration};

    fn dashboard(preview: usize) -> (Dashboard, Arc<SensorStream>, Arc<SensorRegistry>) {
        let stream = Arc::new(SensorStream::new());
        let registry = Arc::new(SensorRegistry::new());
        let dashboard = Dashboard::new(Arc::clone(&stream), Arc::clone(&registry), preview);
        (dashboard, stream, registry)
    }

    #[test]
    fn test_empty_dashboard() {
        let (dashboard, _, registry) = dashboard(3);
        registry
            .register(SensorRegistration::new("T1", "Engine Temp", SensorType::Temperature))
            .unwrap();

        // Registered but no readings yet
        assert!(dashboard.rows().is_empty());
        assert_eq!(dashboard.render_text(), "no data");
    }

    #[test]
    fn test_rows_join_registration_and_preview() {
        let (dashboard, stream, registry) = dashboard(2);
        registry
            .register(SensorRegistration::new("T1", "Engine Temp", SensorType::Temperature))
            .unwrap();
        for value in [70.0, 72.0, 75.0] {
            stream.ingest(SensorReading::new("T1", SensorType::Temperature, value, "°C"));
        }
        stream.ingest(SensorReading::new("A0", SensorType::Motion, 0.1, "g"));

        let rows = dashboard.rows();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].sensor_id, "A0");
        assert!(rows[0].name.is_none());
        assert!(rows[0].status.is_none());

        let engine = &rows[1];
        assert_eq!(engine.name.as_deref(), Some("Engine Temp"));
        assert_eq!(engine.status, Some(SensorStatus::Active));
        assert_eq!(engine.value, 75.0);
        assert_eq!(engine.recent, vec![75.0, 72.0]);

        let text = dashboard.render_text();
        assert!(text.contains("Engine Temp"));
        assert!(text.contains("(unregistered)"));
        assert!(text.contains("75.00, 72.00"));
    }
}
