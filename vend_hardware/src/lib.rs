//! Telemetry sources and command sinks for the vending dashboard.
//!
//! Nothing here talks to the machine directly: the simulator and replay
//! sources stand in for live readings, and the sinks either record commands,
//! hand them to a store bridge through an outbox file, or refuse them.

pub mod error;
pub mod sink;
pub mod telemetry;

pub use sink::{FailingSink, MemorySink, OutboxSink};
pub use telemetry::{ReplayTelemetry, SimulatedTelemetry};
