//! Test and helper collaborators for vend_core.

use vend_traits::{BoxError, CommandSink, TelemetrySample, TelemetrySource};

/// A source that always returns the same reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSource(pub TelemetrySample);

impl TelemetrySource for FixedSource {
    fn read(&mut self, _timeout: std::time::Duration) -> Result<TelemetrySample, BoxError> {
        Ok(self.0)
    }
}

/// A source that never produces data.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSource;

impl TelemetrySource for SilentSource {
    fn read(&mut self, _timeout: std::time::Duration) -> Result<TelemetrySample, BoxError> {
        Err(Box::new(std::io::Error::other("silent source: read timeout")))
    }
}

/// A sink that accepts and forgets every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl CommandSink for NullSink {
    fn send(&mut self, _command: u8) -> Result<(), BoxError> {
        Ok(())
    }
}

/// A sink whose store is unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingSink;

impl CommandSink for RejectingSink {
    fn send(&mut self, _command: u8) -> Result<(), BoxError> {
        Err(Box::new(std::io::Error::other("store unreachable")))
    }
}
