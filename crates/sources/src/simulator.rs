//! Simulated sensor source
//!
//! Generates readings for one sensor from a configurable waveform, with
//! optional random noise. Used for demos and for exercising the ingestion
//! path without real hardware or a message broker.

use std::time::{Duration, Instant};

use anyhow::Result;
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fleet_sens_core::{ReadingSource, SourceMetadata};
use fleet_sens_types::{GeoPoint, SensorReading, SensorType};

pub use fleet_sens_types::source_configs::simulator::{SignalMode, SimulatorConfig};

/// Simulated reading source for a single sensor
pub struct SimulatedSource {
    metadata: SourceMetadata,
    sensor_type: SensorType,
    unit: String,
    location: Option<GeoPoint>,
    config: SimulatorConfig,
    start_time: Instant,
    /// Current position of the random walk
    walk_value: f64,
    rng: StdRng,
    /// Reading produced by the last update
    last: Option<SensorReading>,
}

impl SimulatedSource {
    pub fn new(
        sensor_id: impl Into<String>,
        sensor_type: SensorType,
        unit: impl Into<String>,
        config: SimulatorConfig,
    ) -> Self {
        Self::with_rng(sensor_id.into(), sensor_type, unit.into(), config, StdRng::from_entropy())
    }

    /// Create a source with a fixed random seed (reproducible noise)
    pub fn with_seed(
        sensor_id: impl Into<String>,
        sensor_type: SensorType,
        unit: impl Into<String>,
        config: SimulatorConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(
            sensor_id.into(),
            sensor_type,
            unit.into(),
            config,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        sensor_id: String,
        sensor_type: SensorType,
        unit: String,
        config: SimulatorConfig,
        rng: StdRng,
    ) -> Self {
        let metadata = SourceMetadata {
            id: format!("simulator:{}", sensor_id),
            name: format!("Simulated {}", sensor_id),
            description: format!("Simulated {} signal ({:?})", sensor_type, config.mode),
            sensor_ids: vec![sensor_id],
            default_interval: Duration::from_millis(config.update_interval_ms),
        };
        let walk_value = clamp_to_range(config.base_value, &config);

        Self {
            metadata,
            sensor_type,
            unit,
            location: None,
            config,
            start_time: Instant::now(),
            walk_value,
            rng,
            last: None,
        }
    }

    /// Attach a location to every produced reading
    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    fn sensor_id(&self) -> &str {
        &self.metadata.sensor_ids[0]
    }

    /// Produce the next value for a given time since start
    fn next_value(&mut self, elapsed_secs: f64) -> f64 {
        let config = &self.config;

        if config.mode == SignalMode::RandomWalk {
            let step = if config.noise > 0.0 {
                config.noise
            } else {
                config.range() * 0.01
            };
            let delta = self.rng.gen_range(-step..=step);
            self.walk_value = clamp_to_range(self.walk_value + delta, config);
            return self.walk_value;
        }

        let mut value = wave_value(config, elapsed_secs);
        if config.noise > 0.0 {
            value += self.rng.gen_range(-config.noise..=config.noise);
        }
        clamp_to_range(value, config)
    }
}

/// Noise-free value of a periodic (or constant) signal
fn wave_value(config: &SimulatorConfig, elapsed_secs: f64) -> f64 {
    let range = config.range();
    let period = if config.period > 0.0 { config.period } else { 1.0 };

    match config.mode {
        SignalMode::Constant | SignalMode::RandomWalk => config.base_value,
        SignalMode::SineWave => {
            let phase = (elapsed_secs / period) * std::f64::consts::TAU;
            let normalized = (phase.sin() + 1.0) / 2.0; // 0.0 to 1.0
            config.min_value + normalized * range
        }
        SignalMode::Sawtooth => {
            let normalized = (elapsed_secs / period).fract(); // 0.0 to 1.0
            config.min_value + normalized * range
        }
        SignalMode::Triangle => {
            let phase = (elapsed_secs / period).fract() * 2.0; // 0.0 to 2.0
            let normalized = if phase <= 1.0 { phase } else { 2.0 - phase }; // 0.0 to 1.0 to 0.0
            config.min_value + normalized * range
        }
        SignalMode::Square => {
            let phase = (elapsed_secs / period).fract();
            if phase < 0.5 {
                config.min_value
            } else {
                config.min_value + range
            }
        }
    }
}

/// Clamp into `[min_value, max_value]`; an inverted range collapses to `min_value`
fn clamp_to_range(value: f64, config: &SimulatorConfig) -> f64 {
    value
        .max(config.min_value)
        .min(config.min_value + config.range())
}

impl ReadingSource for SimulatedSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn update(&mut self) -> Result<()> {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let value = self.next_value(elapsed);

        let mut reading = SensorReading::new(
            self.sensor_id(),
            self.sensor_type.clone(),
            value,
            self.unit.as_str(),
        );
        reading.location = self.location;
        trace!("{} -> {:.3} {}", reading.sensor_id, reading.value, reading.unit);

        self.last = Some(reading);
        Ok(())
    }

    fn readings(&self) -> Vec<SensorReading> {
        self.last.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: SignalMode) -> SimulatorConfig {
        SimulatorConfig {
            mode,
            base_value: 75.0,
            min_value: 60.0,
            max_value: 90.0,
            period: 10.0,
            noise: 0.0,
            update_interval_ms: 500,
        }
    }

    #[test]
    fn test_no_readings_before_first_update() {
        let source = SimulatedSource::new("T1", SensorType::Temperature, "°C", config(SignalMode::Constant));
        assert!(source.readings().is_empty());
        assert_eq!(source.metadata().sensor_ids, vec!["T1".to_string()]);
        assert_eq!(source.metadata().default_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_update_produces_reading() {
        let mut source = SimulatedSource::new("T1", SensorType::Temperature, "°C", config(SignalMode::Constant))
            .with_location(GeoPoint::new(60.1, 5.3));
        source.update().unwrap();

        let readings = source.readings();
        assert_eq!(readings.len(), 1);
        let reading = &readings[0];
        assert_eq!(reading.sensor_id, "T1");
        assert_eq!(reading.value, 75.0);
        assert_eq!(reading.unit, "°C");
        assert_eq!(reading.location, Some(GeoPoint::new(60.1, 5.3)));
    }

    #[test]
    fn test_wave_shapes() {
        let sine = config(SignalMode::SineWave);
        assert!((wave_value(&sine, 0.0) - 75.0).abs() < 1e-9);
        assert!((wave_value(&sine, 2.5) - 90.0).abs() < 1e-9);

        let triangle = config(SignalMode::Triangle);
        assert!((wave_value(&triangle, 5.0) - 90.0).abs() < 1e-9);
        assert!((wave_value(&triangle, 0.0) - 60.0).abs() < 1e-9);

        let square = config(SignalMode::Square);
        assert_eq!(wave_value(&square, 1.0), 60.0);
        assert_eq!(wave_value(&square, 6.0), 90.0);

        let sawtooth = config(SignalMode::Sawtooth);
        assert!((wave_value(&sawtooth, 2.5) - 67.5).abs() < 1e-9);
    }

    #[test]
    fn test_values_stay_in_range_with_noise() {
        for mode in [
            SignalMode::Constant,
            SignalMode::SineWave,
            SignalMode::Sawtooth,
            SignalMode::Triangle,
            SignalMode::Square,
            SignalMode::RandomWalk,
        ] {
            let mut cfg = config(mode);
            cfg.noise = 5.0;
            let mut source = SimulatedSource::with_seed("X", SensorType::Pressure, "bar", cfg, 7);
            for step in 0..1000 {
                let value = source.next_value(step as f64 * 0.37);
                assert!((60.0..=90.0).contains(&value), "{:?} produced {}", mode, value);
            }
        }
    }

    #[test]
    fn test_random_walk_moves_by_bounded_steps() {
        let mut cfg = config(SignalMode::RandomWalk);
        cfg.noise = 0.5;
        let mut source = SimulatedSource::with_seed("W", SensorType::WaterQuality, "pH", cfg, 42);

        let mut previous = 75.0;
        for _ in 0..200 {
            let value = source.next_value(0.0);
            assert!((value - previous).abs() <= 0.5 + 1e-9);
            previous = value;
        }
    }

    #[test]
    fn test_inverted_range_collapses_to_min() {
        let mut cfg = config(SignalMode::SineWave);
        cfg.min_value = 10.0;
        cfg.max_value = 0.0;
        let mut source = SimulatedSource::with_seed("Z", SensorType::Motion, "g", cfg, 1);
        assert_eq!(source.next_value(3.0), 10.0);
    }
}
