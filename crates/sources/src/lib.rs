//! fleet-sens-sources: Reading source implementations for fleet-sens.

mod simulator;

pub use simulator::{SignalMode, SimulatedSource, SimulatorConfig};
