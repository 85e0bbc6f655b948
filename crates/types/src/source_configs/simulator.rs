//! Simulated sensor source configuration types.

use serde::{Deserialize, Serialize};

/// Signal shape produced by a simulated sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Fixed base value (plus noise)
    #[default]
    Constant,
    /// Sine wave oscillation
    SineWave,
    /// Sawtooth wave (linear ramp)
    Sawtooth,
    /// Triangle wave
    Triangle,
    /// Square wave
    Square,
    /// Bounded random walk starting at the base value
    RandomWalk,
}

fn default_base_value() -> f64 {
    50.0
}

fn default_max_value() -> f64 {
    100.0
}

fn default_period() -> f64 {
    60.0
}

fn default_update_interval() -> u64 {
    1000
}

/// Simulated sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub mode: SignalMode,
    /// Value used by constant mode and as the random walk's starting point
    #[serde(default = "default_base_value")]
    pub base_value: f64,
    #[serde(default)]
    pub min_value: f64,
    #[serde(default = "default_max_value")]
    pub max_value: f64,
    /// Wave period in seconds (for oscillation modes)
    #[serde(default = "default_period")]
    pub period: f64,
    /// Maximum random deviation added to each value
    #[serde(default)]
    pub noise: f64,
    /// Update interval in milliseconds
    #[serde(default = "default_update_interval")]
    pub update_interval_ms: u64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            mode: SignalMode::Constant,
            base_value: default_base_value(),
            min_value: 0.0,
            max_value: default_max_value(),
            period: default_period(),
            noise: 0.0,
            update_interval_ms: default_update_interval(),
        }
    }
}

impl SimulatorConfig {
    /// Width of the configured value range (never negative)
    pub fn range(&self) -> f64 {
        (self.max_value - self.min_value).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SimulatorConfig =
            serde_json::from_str(r#"{"mode": "sine_wave", "min_value": 60.0}"#).unwrap();
        assert_eq!(config.mode, SignalMode::SineWave);
        assert_eq!(config.min_value, 60.0);
        assert_eq!(config.max_value, 100.0);
        assert_eq!(config.update_interval_ms, 1000);
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let config = SimulatorConfig {
            min_value: 10.0,
            max_value: 5.0,
            ..Default::default()
        };
        assert_eq!(config.range(), 0.0);
    }
}
