//! Startup wiring: builds the stream, registry, sources and dashboard from config

use log::{info, warn};
use std::sync::Arc;

use fleet_sens_core::{SensorRegistry, SensorStream};
use fleet_sens_sources::SimulatedSource;

use super::{Dashboard, IngestManager};
use crate::config::AppConfig;

/// Everything the binary runs, constructed once at startup
///
/// The stream and registry are shared by `Arc`; there is no global state.
pub struct FleetApp {
    pub stream: Arc<SensorStream>,
    pub registry: Arc<SensorRegistry>,
    pub ingest: IngestManager,
    pub dashboard: Dashboard,
}

impl FleetApp {
    pub fn from_config(config: &AppConfig) -> Self {
        let stream = Arc::new(SensorStream::with_capacity(config.stream.capacity));
        let registry = Arc::new(SensorRegistry::new());
        let mut ingest = IngestManager::new(Arc::clone(&stream), Arc::clone(&registry));

        for sensor in &config.sensors {
            if let Err(e) = registry.register(sensor.registration()) {
                // The first definition of an id wins, including its simulator
                warn!("Ignoring sensor config: {}", e);
                continue;
            }

            let source = SimulatedSource::new(
                sensor.id.clone(),
                sensor.sensor_type.clone(),
                sensor.unit(),
                sensor.simulator.clone(),
            )
            .with_location(sensor.location);
            ingest.add_source(Box::new(source));
        }

        info!(
            "Configured {} sensors ({} sources, history capacity {})",
            registry.len(),
            ingest.source_count(),
            stream.capacity()
        );

        let dashboard = Dashboard::new(
            Arc::clone(&stream),
            Arc::clone(&registry),
            config.dashboard.preview,
        );

        Self {
            stream,
            registry,
            ingest,
            dashboard,
        }
    }
}
