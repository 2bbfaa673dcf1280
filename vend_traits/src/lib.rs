//! Contracts between the vending controller and the outside world.
//!
//! The core never talks to a store, a socket or a sensor directly: it pulls
//! samples from a `TelemetrySource` and pushes strategy command codes into a
//! `CommandSink`. Backends live in `vend_hardware`; tests provide their own.
pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

/// Boxed error used at the trait boundary so any backend can plug in.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One telemetry reading from the machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetrySample {
    /// Dispensing motor speed.
    pub rpm: f64,
    /// Vibration amplitude (same arbitrary unit the sensor reports).
    pub vibration: f64,
}

impl TelemetrySample {
    #[inline]
    pub const fn new(rpm: f64, vibration: f64) -> Self {
        Self { rpm, vibration }
    }
}

pub trait TelemetrySource {
    /// Fetch the next sample, blocking for at most `timeout`.
    fn read(&mut self, timeout: std::time::Duration) -> Result<TelemetrySample, BoxError>;
}

pub trait CommandSink {
    /// Deliver a strategy command code (0..=10) to the machine's store.
    fn send(&mut self, command: u8) -> Result<(), BoxError>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn read(&mut self, timeout: std::time::Duration) -> Result<TelemetrySample, BoxError> {
        (**self).read(timeout)
    }
}

impl<T: CommandSink + ?Sized> CommandSink for Box<T> {
    fn send(&mut self, command: u8) -> Result<(), BoxError> {
        (**self).send(command)
    }
}
