//! Source configuration types for reading sources.

pub mod simulator;

pub use simulator::{SignalMode, SimulatorConfig};
